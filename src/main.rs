use std::env;
use std::path::Path;

use flavorai::{AnalysisRequest, AppConfig, FlavorPipeline, Media, VideoFormat};
use log::info;

const USAGE: &str = "Usage:
  flavorai [serve]                          Start the web UI
  flavorai analyze <media> [preferences...] Analyze an image or video file once";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::load()?;

    match args.first().map(String::as_str) {
        None | Some("serve") => {
            let pipeline = FlavorPipeline::from_config(&config)?;
            flavorai::server::serve(pipeline, &config.server).await?;
        }
        Some("analyze") => {
            let path = args.get(1).ok_or(USAGE)?;
            let preferences = args[2..].join(" ");
            let pipeline = FlavorPipeline::from_config(&config)?;

            let media = load_media(Path::new(path)).await?;
            info!("Analyzing {} ({})", path, media.kind());

            let analysis = pipeline
                .process(AnalysisRequest {
                    media: Some(media),
                    preferences: Some(preferences),
                    cached_ingredients: None,
                })
                .await;
            println!("{}\n\n{}", analysis.ingredients, analysis.recipe);
        }
        Some(_) => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Files with a known video extension are sent as video, everything else as an image
async fn load_media(path: &Path) -> Result<Media, flavorai::FlavorError> {
    let is_video = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(VideoFormat::from_extension)
        .is_some();

    if is_video {
        Media::video_file(path).await
    } else {
        Media::image_file(path).await
    }
}
