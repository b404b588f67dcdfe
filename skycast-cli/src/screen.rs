//! The interactive weather screen.
//!
//! Fetches run on spawned tasks and their results come back over a channel;
//! [`apply`] is the single place those results mutate the state container.
//! The prompt/menu loop only ever renders the container's current snapshot.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};
use inquire::{InquireError, Select, Text};
use skycast_core::{
    Config, DetailsToggle, FetchError, ScreenState, Submit, UiState, WeatherDetail, WeatherIcon,
    WeatherProvider, WeatherSummary, provider_from_config,
};
use tokio::sync::mpsc;

use crate::view;

const MENU_SHOW_DETAILS: &str = "Show more details";
const MENU_HIDE_DETAILS: &str = "Hide details";
const MENU_SEARCH: &str = "Search another city";
const MENU_QUIT: &str = "Quit";

/// Results marshalled from fetch tasks back onto the screen's update path.
#[derive(Debug)]
enum ScreenMsg {
    Summary(Result<WeatherSummary, FetchError>),
    Icon(Result<WeatherIcon, FetchError>),
    Detail(Result<WeatherDetail, FetchError>),
}

/// Apply one fetch result to the state container. Icon and detail failures
/// degrade the card instead of erroring it.
fn apply(state: &mut ScreenState, msg: ScreenMsg) {
    match msg {
        ScreenMsg::Summary(Ok(summary)) => state.summary_loaded(summary),
        ScreenMsg::Summary(Err(err)) => state.summary_failed(err.to_string()),
        ScreenMsg::Icon(Ok(icon)) => state.icon_loaded(icon),
        ScreenMsg::Icon(Err(err)) => {
            tracing::warn!("icon fetch failed: {err}");
        }
        ScreenMsg::Detail(Ok(detail)) => state.detail_loaded(detail),
        ScreenMsg::Detail(Err(err)) => {
            tracing::warn!("detail fetch failed: {err}");
            state.detail_failed();
        }
    }
}

/// The interactive screen: prompt, fetch, render, menu, repeat.
pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let mut state = ScreenState::new();
    println!("{}", view::render(state.state()));

    loop {
        let city = match Text::new("City:").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        if let Submit::Started(city) = state.submit(&city) {
            run_fetch_cycle(&mut state, &provider, &city).await?;
        }

        println!("{}", view::render(state.state()));

        if matches!(state.state(), UiState::Loaded(_)) && !details_menu(&mut state, &provider).await? {
            break;
        }
    }

    Ok(())
}

/// One-shot `skycast show CITY`: same state container and view, no prompts.
pub async fn show_once(city: &str, details: bool) -> Result<()> {
    let config = Config::load()?;
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let mut state = ScreenState::new();
    if let Submit::Started(city) = state.submit(city) {
        run_fetch_cycle(&mut state, &provider, &city).await?;
    }

    if details {
        if let DetailsToggle::FetchNeeded(city) = state.toggle_details() {
            fetch_detail_into(&mut state, &provider, city).await?;
        }
    }

    match state.state() {
        UiState::Error(message) => anyhow::bail!("{message}"),
        state => println!("{}", view::render(state)),
    }

    Ok(())
}

/// Spawn the summary fetch, then the icon fetch once a summary names its
/// icon code. Each result flows through `apply`.
async fn run_fetch_cycle(
    state: &mut ScreenState,
    provider: &Arc<dyn WeatherProvider>,
    city: &str,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<ScreenMsg>(4);

    let summary_tx = tx.clone();
    let summary_provider = Arc::clone(provider);
    let summary_city = city.to_string();
    tokio::spawn(async move {
        let result = summary_provider.fetch_summary(&summary_city).await;
        let _ = summary_tx.send(ScreenMsg::Summary(result)).await;
    });

    let msg = recv_with_spinner(&mut rx, &format!("Fetching weather for {city}")).await?;
    apply(state, msg);

    if let UiState::Loaded(loaded) = state.state() {
        let icon_tx = tx.clone();
        let icon_provider = Arc::clone(provider);
        let icon_code = loaded.summary.icon_code.clone();
        tokio::spawn(async move {
            let result = icon_provider.fetch_icon(&icon_code).await;
            let _ = icon_tx.send(ScreenMsg::Icon(result)).await;
        });

        let msg = recv_with_spinner(&mut rx, "Fetching icon").await?;
        apply(state, msg);
    }

    Ok(())
}

async fn fetch_detail_into(
    state: &mut ScreenState,
    provider: &Arc<dyn WeatherProvider>,
    city: String,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<ScreenMsg>(1);

    let detail_provider = Arc::clone(provider);
    tokio::spawn(async move {
        let result = detail_provider.fetch_detail(&city).await;
        let _ = tx.send(ScreenMsg::Detail(result)).await;
    });

    let msg = recv_with_spinner(&mut rx, "Fetching details").await?;
    apply(state, msg);
    Ok(())
}

/// Menu under the loaded card. Returns `false` when the user chose to quit.
async fn details_menu(
    state: &mut ScreenState,
    provider: &Arc<dyn WeatherProvider>,
) -> Result<bool> {
    loop {
        let toggle_label = match state.state() {
            UiState::Loaded(loaded) if loaded.details_shown => MENU_HIDE_DETAILS,
            _ => MENU_SHOW_DETAILS,
        };

        let choice = match Select::new("Next:", vec![toggle_label, MENU_SEARCH, MENU_QUIT]).prompt()
        {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        match choice {
            c if c == MENU_SEARCH => return Ok(true),
            c if c == MENU_QUIT => return Ok(false),
            _ => {
                if let DetailsToggle::FetchNeeded(city) = state.toggle_details() {
                    fetch_detail_into(state, provider, city).await?;
                }
                println!("{}", view::render(state.state()));
            }
        }
    }
}

/// Await the next marshalled result, rendering a spinner line while waiting.
async fn recv_with_spinner(rx: &mut mpsc::Receiver<ScreenMsg>, label: &str) -> Result<ScreenMsg> {
    let mut ticker = tokio::time::interval(Duration::from_millis(120));
    let mut frame = 0usize;
    let mut out = std::io::stdout();

    let msg = loop {
        tokio::select! {
            msg = rx.recv() => break msg,
            _ = ticker.tick() => {
                execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                print!("{} {label}", view::SPINNER_FRAMES[frame % view::SPINNER_FRAMES.len()]);
                out.flush()?;
                frame += 1;
            }
        }
    };

    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    msg.ok_or_else(|| anyhow::anyhow!("fetch task dropped its result channel"))
}
