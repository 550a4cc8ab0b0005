use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use catalog_core::{update, ListViewModel, ListViewState, Msg, Notification};
use catalog_engine::{
    ChannelPushTransport, EngineHandle, PushTransport, ReqwestGameApi, ReverbTransport,
};
use catalog_logging::{catalog_info, catalog_warn};
use chrono::Local;

use super::commands::{self, Command, HELP};
use super::config::AppConfig;
use super::effects::{AppEventSink, AppMsg, EffectRunner};
use super::ui;

pub fn run_app(config: AppConfig, push_enabled: bool) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<AppMsg>();

    let api = ReqwestGameApi::new(config.api_settings()).context("configuring the games API")?;
    let transport: Arc<dyn PushTransport> = if push_enabled {
        Arc::new(ReverbTransport::new(config.push_settings()))
    } else {
        catalog_info!("live updates disabled");
        Arc::new(ChannelPushTransport::default())
    };
    let engine = EngineHandle::start(
        Arc::new(api),
        transport,
        config.engine_settings(),
        Arc::new(AppEventSink::new(msg_tx.clone())),
    )
    .context("starting the engine")?;

    spawn_input_reader(msg_tx).context("starting the input reader")?;

    let mut app = App::new(EffectRunner::new(engine), io::stdout());
    app.print(&[format!("catalog {} (type 'help')", env!("CARGO_PKG_VERSION"))])?;
    app.dispatch(Msg::Mounted)?;

    for msg in msg_rx {
        let keep_running = match msg {
            AppMsg::Core(msg) => {
                app.dispatch(msg)?;
                true
            }
            AppMsg::RecordLoaded { id, result } => {
                match result {
                    Ok(record) => app.print(&ui::render::record_detail(&record))?,
                    Err(err) => app.print(&[format!("could not load game {id}: {err}")])?,
                }
                true
            }
            AppMsg::Input(line) => app.handle_input(&line)?,
            AppMsg::InputClosed => false,
        };
        if !keep_running {
            break;
        }
    }

    app.dispatch(Msg::Disposed)?;
    catalog_info!("catalog app exiting");
    Ok(())
}

struct App<W: Write> {
    state: ListViewState,
    shown: Option<ListViewModel>,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> App<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: ListViewState::new(),
            shown: None,
            runner,
            out,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        let notifications = self.runner.enqueue(effects);
        if was_dirty {
            let lines = ui::render::render(&view, self.shown.as_ref());
            self.print(&lines)?;
            self.shown = Some(view);
        }
        self.notify(&notifications)
    }

    /// Returns `false` once the user asked to quit.
    fn handle_input(&mut self, line: &str) -> io::Result<bool> {
        let command = match commands::parse(line) {
            None => return Ok(true),
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                self.print(&[err.to_string()])?;
                return Ok(true);
            }
        };

        match command {
            Command::Search(text) => self.dispatch(Msg::SearchChanged(text))?,
            Command::Genre(value) => self.dispatch(Msg::GenreChanged(value))?,
            Command::Status(value) => self.dispatch(Msg::StatusChanged(value))?,
            Command::Sort(column) => self.dispatch(Msg::SortToggled(column))?,
            Command::Show(id) => {
                if let Err(err) = self.runner.load_record(id) {
                    catalog_warn!("record lookup for id={} not sent: {}", id, err);
                    self.print(&[format!("could not load game {id}: {err}")])?;
                }
            }
            Command::List => {
                let lines = ui::render::table(&self.state.view());
                self.print(&lines)?;
            }
            Command::Help => self.print(&[HELP.to_string()])?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn notify(&mut self, notifications: &[Notification]) -> io::Result<()> {
        let now = Local::now().time();
        let lines: Vec<String> = notifications
            .iter()
            .map(|notification| ui::render::notification_line(notification, now))
            .collect();
        self.print(&lines)
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

fn spawn_input_reader(msg_tx: mpsc::Sender<AppMsg>) -> io::Result<()> {
    thread::Builder::new()
        .name("catalog-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if msg_tx.send(AppMsg::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        catalog_warn!("reading input failed: {}", err);
                        break;
                    }
                }
            }
            let _ = msg_tx.send(AppMsg::InputClosed);
        })?;
    Ok(())
}
