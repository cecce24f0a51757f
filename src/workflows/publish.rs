//! Publishing: platform connection state and the per-session selection.

use crate::api::{ApiClient, AuthStatus};
use crate::models::{Platform, PlatformSelection};
use crate::workflows::WorkflowError;

/// Connection state plus the user's transient platform choice. The selection
/// lives only for the session; nothing here is persisted.
#[derive(Debug)]
pub struct PublishState {
    pub connections: AuthStatus,
    pub selection: PlatformSelection,
}

impl PublishState {
    pub fn toggle(&mut self, platform: Platform) {
        match platform {
            Platform::YouTube => self.selection.yt = !self.selection.yt,
            Platform::Instagram => self.selection.ig = !self.selection.ig,
        }
    }

    /// Selected platforms the user has not connected yet.
    pub fn missing_connections(&self) -> Vec<Platform> {
        self.selection
            .platforms()
            .into_iter()
            .filter(|platform| !self.connections.is_connected(*platform))
            .collect()
    }
}

/// Fetches the current connection state for a fresh publish session.
pub async fn load(api: &ApiClient, user_id: &str) -> Result<PublishState, WorkflowError> {
    let connections = api.auth_status(user_id).await?;
    Ok(PublishState {
        connections,
        selection: PlatformSelection::default(),
    })
}

/// Requests an OAuth connect URL for a platform.
pub async fn connect_url(
    api: &ApiClient,
    platform: Platform,
    user_id: &str,
) -> Result<String, WorkflowError> {
    api.connect_url(platform, user_id)
        .await
        .map_err(WorkflowError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_connections_reflect_selection_and_status() {
        let mut state = PublishState {
            connections: AuthStatus {
                youtube: true,
                instagram: false,
            },
            selection: PlatformSelection::default(),
        };
        assert!(state.missing_connections().is_empty());

        state.toggle(Platform::YouTube);
        state.toggle(Platform::Instagram);
        assert_eq!(state.missing_connections(), vec![Platform::Instagram]);

        state.toggle(Platform::Instagram);
        assert!(state.missing_connections().is_empty());
    }
}
