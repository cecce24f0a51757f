use std::env;
use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};

use storiq::api::ApiClient;
use storiq::config::{self, Config, ConfigStore, Session, User};
use storiq::crop::CropSelection;
use storiq::exports::ExportStore;
use storiq::logging;
use storiq::models::{GenerateConfig, Platform};
use storiq::workflows::export::ExportFlow;
use storiq::workflows::mount::MountPipeline;
use storiq::workflows::script::ScriptFlow;
use storiq::workflows::video::VideoFlow;
use storiq::workflows::{export, publish, script, stats};

fn print_usage() {
    eprintln!(
        "usage: storiq <command> [args]

commands:
  login <token> <user-id> [email]   store the session
  logout                            discard the session
  script <prompt>                   generate a script
  video <prompt> [duration]         generate a video (duration in seconds)
  videos                            list your videos
  delete <s3-key>                   delete a stored video
  crop <video-url> <start> <end> [duration]
                                    queue a crop/export job
  exports [--reconcile]             list export history, optionally refresh job status
  mount <video-url> <text> [voice]  narrate a video with synthesized speech
  voices                            list available TTS voices
  stats                             show analytics
  history [rm <id> | clear]         script history
  publish                           show platform connections"
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        bail!("no command given");
    };

    let store = ConfigStore::default_location()?;

    match command.as_str() {
        "login" => {
            let token = arg(&args, 1, "token")?;
            let user_id = arg(&args, 2, "user-id")?;
            let email = args.get(3).cloned();
            store.store_session(Session {
                token: token.to_string(),
                user: User {
                    id: user_id.to_string(),
                    email,
                    name: None,
                },
            })?;
            println!("Logged in as {user_id}");
        }
        "logout" => {
            store.clear_session()?;
            println!("Logged out");
        }
        "script" => {
            let prompt = arg(&args, 1, "prompt")?;
            let (api, session) = client_and_session(&store)?;
            let script_text = ScriptFlow::new()
                .generate(&api, &session.user.id, prompt)
                .await?;
            println!("{script_text}");
        }
        "video" => {
            let prompt = arg(&args, 1, "prompt")?;
            let config = match args.get(2) {
                Some(raw) => GenerateConfig::with_duration(
                    raw.parse().context("duration must be a whole number of seconds")?,
                ),
                None => GenerateConfig::default(),
            };
            let (api, _) = client_and_session(&store)?;
            let video = VideoFlow::new().generate(&api, prompt, &config).await?;
            println!("Generated: {}", video.s3_url);
            println!("Storage key: {}", video.s3_key);
        }
        "videos" => {
            let (api, session) = client_and_session(&store)?;
            let videos = api.list_videos(&session.user.id).await?;
            if videos.is_empty() {
                println!("No videos yet");
            }
            for video in videos {
                let title = video.title.as_deref().unwrap_or("(untitled)");
                println!("{title}  {}", video.url);
            }
        }
        "delete" => {
            let s3_key = arg(&args, 1, "s3-key")?;
            let (api, _) = client_and_session(&store)?;
            api.delete_video(s3_key).await?;
            println!("Deleted {s3_key}");
        }
        "crop" => {
            let video_url = arg(&args, 1, "video-url")?;
            let start: f64 = arg(&args, 2, "start")?.parse().context("start must be seconds")?;
            let end: f64 = arg(&args, 3, "end")?.parse().context("end must be seconds")?;
            let duration: f64 = match args.get(4) {
                Some(raw) => raw.parse().context("duration must be seconds")?,
                None => end,
            };

            let mut selection = CropSelection::new(duration);
            selection.set_start(start);
            selection.set_end(end);

            let (api, session) = client_and_session(&store)?;
            let exports_store = ExportStore::default_location()?;
            let entry = ExportFlow::new()
                .submit(&api, &exports_store, &session.user.id, video_url, &selection)
                .await?;
            println!(
                "Queued export {} (job {}, {:.2}s-{:.2}s)",
                entry.export_id, entry.job_id, entry.crop.start, entry.crop.end
            );
        }
        "exports" => {
            let exports_store = ExportStore::default_location()?;
            if args.iter().any(|a| a == "--reconcile") {
                let (api, _) = client_and_session(&store)?;
                let updated = export::reconcile(&api, &exports_store).await?;
                println!("Refreshed {updated} job status(es)");
            }
            let list = exports_store.load()?;
            if list.entries.is_empty() {
                println!("No exports yet");
            }
            for entry in &list.entries {
                println!(
                    "{}  {}  [{:.2}s-{:.2}s]  {}",
                    entry.export_id, entry.status, entry.crop.start, entry.crop.end, entry.filename
                );
            }
        }
        "mount" => {
            let video_url = arg(&args, 1, "video-url")?;
            let text = arg(&args, 2, "text")?;
            let voice = args.get(3).map(String::as_str).unwrap_or("default");
            let (api, _) = client_and_session(&store)?;
            let mounted = MountPipeline::new()
                .run(&api, video_url, text, voice)
                .await?;
            println!("Mounted: {mounted}");
        }
        "voices" => {
            let (api, _) = client_and_session(&store)?;
            for voice in api.list_voices().await? {
                println!("{}  {}", voice.id, voice.name);
            }
        }
        "stats" => {
            let (api, session) = client_and_session(&store)?;
            let overview = stats::load(&api, &session.user.id).await?;
            println!(
                "{} videos, {} views, {} exports",
                overview.summary.total_videos,
                overview.summary.total_views,
                overview.summary.total_exports
            );
            println!(
                "last {} days: {} views ({:.1}/day)",
                overview.series.len(),
                overview.totals.views,
                overview.totals.daily_average
            );
            if let Some((date, views)) = overview.totals.peak_day {
                println!("best day: {date} with {views} views");
            }
        }
        "history" => {
            let (api, session) = client_and_session(&store)?;
            match args.get(1).map(String::as_str) {
                Some("rm") => {
                    let id = arg(&args, 2, "id")?;
                    script::delete_history_item(&api, id).await?;
                    println!("Removed {id}");
                }
                Some("clear") => {
                    script::clear_history(&api, &session.user.id).await?;
                    println!("History cleared");
                }
                None => {
                    let items = api.script_history(&session.user.id).await?;
                    if items.is_empty() {
                        println!("No history yet");
                    }
                    for item in items {
                        let id = item.id.as_deref().unwrap_or("-");
                        println!("{id}  {}  {}", item.created_at.format("%Y-%m-%d"), item.prompt);
                    }
                }
                Some(other) => bail!("unknown history subcommand `{other}`"),
            }
        }
        "publish" => {
            let (api, session) = client_and_session(&store)?;
            let state = publish::load(&api, &session.user.id).await?;
            for platform in [Platform::YouTube, Platform::Instagram] {
                if state.connections.is_connected(platform) {
                    println!("{platform}: connected");
                } else {
                    let url = publish::connect_url(&api, platform, &session.user.id).await?;
                    println!("{platform}: not connected, visit {url}");
                }
            }
        }
        _ => {
            print_usage();
            bail!("unknown command `{command}`");
        }
    }

    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))
}

fn client_and_session(store: &ConfigStore) -> anyhow::Result<(ApiClient, Session)> {
    let config = store.load_or_default()?;
    let session = config
        .session
        .clone()
        .ok_or_else(|| anyhow!("not logged in; run `storiq login <token> <user-id>`"))?;
    let api = build_client(&config, Some(session.token.clone()))?;
    Ok((api, session))
}

fn build_client(config: &Config, token: Option<String>) -> anyhow::Result<ApiClient> {
    let base = config::resolve_api_base(config);
    ApiClient::new(base, token).map_err(Into::into)
}
