use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rusty_jukebox::commands::music::{
    audio_sources::youtube::YoutubeApi, join, leave, pause, play, prev, queue, resume, skip,
    utils::voice_transport::SongbirdTransport,
};
use rusty_jukebox::utils::config::BotConfig;
use rusty_jukebox::{CommandResult, Context, Data, Error};

#[poise::command(prefix_command, slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rusty_jukebox=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    // Songbird keeps the yt-dlp program name for the life of the process
    let ytdlp_program: &'static str = config.ytdlp_path.clone().leak();

    // One songbird instance shared by the gateway client and the music players
    let songbird = Songbird::serenity();
    let transport = Arc::new(SongbirdTransport::new(Arc::clone(&songbird), ytdlp_program));
    let data = Data::new(transport, YoutubeApi::new(config.ytdlp_path.clone()));

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Music commands
        join(),
        leave(),
        play(),
        pause(),
        resume(),
        skip(),
        prev(),
        queue(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| {
                Box::pin(async move {
                    if let Err(e) = poise::builtins::on_error(error).await {
                        tracing::error!("Error while handling error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        });

    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework.build())
        .register_songbird_with(songbird)
        .await?;

    // Shut the shards down cleanly on Ctrl-C
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    client.start().await.map_err(Into::into)
}
