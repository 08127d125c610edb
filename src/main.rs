use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

use dexgrid::action::Action;
use dexgrid::api;
use dexgrid::artwork;
use dexgrid::effect::Effect;
use dexgrid::reducer::reducer;
use dexgrid::state::AppState;
use dexgrid::ui;

#[derive(Parser, Debug)]
#[command(name = "dexgrid")]
#[command(about = "Paginated Pokedex grid browser for the terminal")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::GridUi::new()));
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(150), || Action::Tick);
            },
            |frame, area, state, render_ctx: RenderContext| {
                ui.borrow_mut().render(frame, area, state, render_ctx);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadRoster => {
            ctx.tasks().spawn(TaskKey::new("roster"), async {
                match api::fetch_roster().await {
                    Ok(entries) => Action::RosterDidLoad(entries),
                    Err(err) => Action::RosterDidError(err.to_string()),
                }
            });
        }
        Effect::LoadTypeList => {
            ctx.tasks().spawn(TaskKey::new("types"), async {
                match api::fetch_type_list().await {
                    Ok(types) => Action::TypesDidLoad(types),
                    Err(err) => Action::TypesDidError(err.to_string()),
                }
            });
        }
        Effect::LoadTypeMembers { name } => {
            let key = format!("members_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_type_members(&name).await {
                    Ok(members) => Action::TypeMembersDidLoad { name, members },
                    Err(err) => Action::TypeMembersDidError {
                        name,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetail { name } => {
            let key = format!("detail_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_detail(&name).await {
                    Ok(detail) => Action::DetailDidLoad(detail),
                    Err(err) => Action::DetailDidError {
                        name,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadArtwork { name, url } => {
            let key = format!("artwork_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_artwork_bytes(&url).await {
                    Ok(bytes) => match artwork::decode_artwork(&bytes) {
                        Ok(art) => Action::ArtworkDidLoad { name, art },
                        Err(error) => Action::ArtworkDidError { name, error },
                    },
                    Err(err) => Action::ArtworkDidError {
                        name,
                        error: err.to_string(),
                    },
                }
            });
        }
    }
}
