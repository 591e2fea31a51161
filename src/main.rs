use clap::Parser;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use tiny_player::app::App;
use tiny_player::app_version;
use tiny_player::args::AppArgs;
use tiny_player::audio::rodio_engine::RodioEngine;
use tiny_player::store::{save_config_to, store_path, CONFIG_FILENAME, LOG_FILENAME};
use tiny_player::tui::Tui;
use tiny_player::types::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> AppResult<()> {
    let args = AppArgs::parse();

    let logfile_path = store_path(LOG_FILENAME)?;
    let logfile = FileAppender::builder()
        .append(false)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build(logfile_path)?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))?;

    log4rs::init_config(config)?;
    let [major, minor, patch] = app_version();
    log::info!("Tiny player v{major}.{minor}.{patch}");

    let player_config = args.resolve_config()?;

    if args.save_config {
        let path = match args.config.as_ref() {
            Some(path) => path.clone(),
            None => store_path(CONFIG_FILENAME)?,
        };
        save_config_to(&path, &player_config)?;
        println!("Config saved to {}", path.display());
        return Ok(());
    }

    let mut app = App::new(RodioEngine::new(), player_config);
    app.initialize_player(args.start_at).await;

    let tui = Tui::new_local()?;
    app.run(tui).await?;

    Ok(())
}
