use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use log::debug;
use serde::Serialize;

use crate::editor::EditorSession;
use crate::error::{ArityError, EditorError};

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), EditorError>> + 'a>>;

/// A console command. Receives the session and the positional arguments
/// that followed the command name.
pub type Handler = for<'a> fn(&'a mut EditorSession, &'a [String]) -> HandlerFuture<'a>;

/// Wraps an `async fn(&mut EditorSession, &[String]) -> Result<(), EditorError>`
/// into a [`Handler`] pointer.
macro_rules! handler {
    ($command:path) => {{
        fn boxed<'a>(
            session: &'a mut $crate::editor::EditorSession,
            args: &'a [String],
        ) -> $crate::editor::command::registry::HandlerFuture<'a> {
            Box::pin($command(session, args))
        }
        boxed as $crate::editor::command::registry::Handler
    }};
}

pub(crate) use handler;

/// Priority class of a command. User commands shadow built-ins of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    User,
    Builtin,
}

/// Number of positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub required: usize,
    pub optional: usize,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            required: count,
            optional: 0,
        }
    }

    pub const fn with_optional(required: usize, optional: usize) -> Self {
        Self { required, optional }
    }

    pub fn accepts(&self, given: usize) -> bool {
        (self.required..=self.required + self.optional).contains(&given)
    }

    pub fn check(&self, name: &str, given: usize) -> Result<(), ArityError> {
        if self.accepts(given) {
            return Ok(());
        }

        Err(ArityError {
            name: name.to_string(),
            expected: self.to_string(),
            given,
        })
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.required + self.optional;
        match (self.required, max) {
            (0, 0) => f.write_str("no arguments"),
            (1, 1) => f.write_str("1 argument"),
            (min, max) if min == max => write!(f, "{min} arguments"),
            (min, max) => write!(f, "from {min} to {max} arguments"),
        }
    }
}

/// Static description of a command, used when registering it.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub handler: Handler,
    pub arity: Arity,
    pub doc: &'static str,
}

#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub handler: Handler,
    pub arity: Arity,
    pub doc: &'static str,
    pub tier: Tier,
    /// Position of the first registration under this name.
    pub order: usize,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("tier", &self.tier)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Command name to handler, in two tiers.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    user: HashMap<&'static str, CommandEntry>,
    builtin: HashMap<&'static str, CommandEntry>,
    next_order: usize,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` in `tier`. Registering a name again in the same tier
    /// replaces the handler but keeps the original listing position.
    pub fn register(&mut self, tier: Tier, spec: CommandSpec) {
        let order = self.next_order;
        let commands = self.tier_mut(tier);

        match commands.get_mut(spec.name) {
            Some(existing) => {
                debug!("re-registering {:?} command {}", tier, spec.name);
                existing.handler = spec.handler;
                existing.arity = spec.arity;
                existing.doc = spec.doc;
            }
            None => {
                commands.insert(
                    spec.name,
                    CommandEntry {
                        name: spec.name,
                        handler: spec.handler,
                        arity: spec.arity,
                        doc: spec.doc,
                        tier,
                        order,
                    },
                );
                self.next_order += 1;
            }
        }
    }

    pub fn register_all(&mut self, tier: Tier, specs: &[CommandSpec]) {
        for spec in specs {
            self.register(tier, *spec);
        }
    }

    pub fn unregister(&mut self, tier: Tier, name: &str) -> Option<CommandEntry> {
        self.tier_mut(tier).remove(name)
    }

    /// User tier first, then built-ins. `None` means the host shell should
    /// handle the command.
    pub fn resolve(&self, name: &str) -> Option<CommandEntry> {
        self.user
            .get(name)
            .or_else(|| self.builtin.get(name))
            .copied()
    }

    /// Commands of one tier in registration order.
    pub fn listing(&self, tier: Tier) -> Vec<CommandEntry> {
        let mut entries: Vec<CommandEntry> = self.tier(tier).values().copied().collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    fn tier(&self, tier: Tier) -> &HashMap<&'static str, CommandEntry> {
        match tier {
            Tier::User => &self.user,
            Tier::Builtin => &self.builtin,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut HashMap<&'static str, CommandEntry> {
        match tier {
            Tier::User => &mut self.user,
            Tier::Builtin => &mut self.builtin,
        }
    }
}
