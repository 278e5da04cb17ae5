use log::{debug, info, warn};

use super::history::CommandHistory;
use super::registry::{CommandEntry, CommandRegistry, Tier};
use crate::editor::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Evaluating,
}

/// What happened to a submitted command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchOutcome {
    /// Blank input; nothing ran and history is untouched.
    #[default]
    Idle,
    Dispatched { name: String, tier: Tier },
    ShellFallback { cmd: String },
    ArgMismatch { detail: String },
}

/// Command-side state of a session: the registry, the history and the output
/// captured after the last request.
#[derive(Debug)]
pub struct CommandDispatcher {
    pub registry: CommandRegistry,
    pub history: CommandHistory,
    /// Output log contents as of the end of the last request.
    pub output: String,
    state: DispatchState,
    last_outcome: DispatchOutcome,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            history: CommandHistory::default(),
            output: String::new(),
            state: DispatchState::Idle,
            last_outcome: DispatchOutcome::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn last_outcome(&self) -> &DispatchOutcome {
        &self.last_outcome
    }
}

/// Runs the submitted command, if any, then snapshots the output log.
pub async fn update(session: &mut EditorSession, cmd: Option<&str>) {
    session.shell.begin_request();

    if let Some(cmd) = cmd {
        evaluate(session, cmd).await;
    }

    session.command.output = session.shell.log().contents();
}

/// Evaluates one raw command line: built-in or user command if the first word
/// names one, otherwise the host shell after syncing its directory.
///
/// Arguments are split on whitespace; quoting is not supported.
pub async fn evaluate(session: &mut EditorSession, cmd: &str) -> DispatchOutcome {
    let mut words = cmd.split_whitespace();
    let Some(name) = words.next() else {
        return DispatchOutcome::Idle;
    };
    let args: Vec<String> = words.map(str::to_string).collect();

    session.command.state = DispatchState::Evaluating;
    if !session.command.history.push(cmd) {
        debug!("not recording repeated command: {}", cmd);
    }

    let outcome = match session.command.registry.resolve(name) {
        Some(entry) => invoke(session, entry, &args).await,
        None => {
            info!("{} is not registered, handing it to the shell", name);
            let current_dir = session.state.current_dir.clone();
            session.shell.change_dir(&current_dir);
            session.shell.run(cmd).await;
            DispatchOutcome::ShellFallback {
                cmd: cmd.to_string(),
            }
        }
    };

    session.command.state = DispatchState::Idle;
    session.command.last_outcome = outcome.clone();
    outcome
}

async fn invoke(session: &mut EditorSession, entry: CommandEntry, args: &[String]) -> DispatchOutcome {
    if let Err(e) = entry.arity.check(entry.name, args.len()) {
        warn!("{}", e);
        session
            .log()
            .add_line(format!("arguments do not match: {e}"));
        return DispatchOutcome::ArgMismatch {
            detail: e.to_string(),
        };
    }

    info!("running {:?} command {} {:?}", entry.tier, entry.name, args);
    if let Err(e) = (entry.handler)(session, args).await {
        warn!("{} failed: {}", entry.name, e);
        session.log().add_line(format!("error: {e}"));
    }

    DispatchOutcome::Dispatched {
        name: entry.name.to_string(),
        tier: entry.tier,
    }
}
