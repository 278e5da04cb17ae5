pub mod dispatcher;
pub mod history;
pub mod registry;

pub use dispatcher::{CommandDispatcher, DispatchOutcome, DispatchState};
pub use history::CommandHistory;
pub use registry::{Arity, CommandEntry, CommandRegistry, CommandSpec, Handler, HandlerFuture, Tier};
