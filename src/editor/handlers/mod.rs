//! Built-in console commands.
//!
//! Every handler resolves its arguments against the current directory and
//! reports precondition failures (missing source, existing destination, ...)
//! as a line in the output log rather than as an error.

pub mod archive_ops;
pub mod console_ops;
pub mod dir_ops;
pub mod file_ops;
pub mod tool_ops;

use super::command::registry::handler;
use super::command::{Arity, CommandSpec};

/// Built-ins in listing order.
pub const BUILTIN_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "save",
        handler: handler!(file_ops::save),
        arity: Arity::with_optional(0, 1),
        doc: "save: overwrite the open file / save test.py: save the buffer as a new file test.py",
    },
    CommandSpec {
        name: "deletelog",
        handler: handler!(console_ops::delete_log),
        arity: Arity::exactly(0),
        doc: "clear the output log",
    },
    CommandSpec {
        name: "deletecmd",
        handler: handler!(console_ops::delete_history),
        arity: Arity::exactly(0),
        doc: "clear the command history",
    },
    CommandSpec {
        name: "cd",
        handler: handler!(dir_ops::change_directory),
        arity: Arity::exactly(1),
        doc: "cd path: move the editor (and the shell) to path",
    },
    CommandSpec {
        name: "history",
        handler: handler!(console_ops::show_history),
        arity: Arity::exactly(0),
        doc: "show the command history",
    },
    CommandSpec {
        name: "rm2",
        handler: handler!(file_ops::remove),
        arity: Arity::exactly(1),
        doc: "rm2 name: delete a file or a directory tree",
    },
    CommandSpec {
        name: "mv2",
        handler: handler!(file_ops::move_entry),
        arity: Arity::exactly(2),
        doc: "mv2 before after: rename or move a file or directory",
    },
    CommandSpec {
        name: "cp2",
        handler: handler!(file_ops::copy_entry),
        arity: Arity::exactly(2),
        doc: "cp2 origin new: copy a file or directory tree",
    },
    CommandSpec {
        name: "check",
        handler: handler!(tool_ops::lint_check),
        arity: Arity::with_optional(0, 1),
        doc: "check [file]: run the linter on file, or on the open file",
    },
    CommandSpec {
        name: "auto",
        handler: handler!(tool_ops::auto_format),
        arity: Arity::with_optional(0, 1),
        doc: "auto [path]: run the formatter on a file or on every matching file in a directory",
    },
    CommandSpec {
        name: "freeze",
        handler: handler!(archive_ops::compress),
        arity: Arity::with_optional(1, 1),
        doc: "freeze path [zip|tar|gztar]: archive path into the current directory",
    },
    CommandSpec {
        name: "unfreeze",
        handler: handler!(archive_ops::decompress),
        arity: Arity::exactly(1),
        doc: "unfreeze archive: extract a .zip, .tar or .tar.gz into the current directory",
    },
    CommandSpec {
        name: "save_encoding",
        handler: handler!(console_ops::set_save_encoding),
        arity: Arity::exactly(1),
        doc: "save_encoding label: encoding used when saving",
    },
    CommandSpec {
        name: "open_encoding",
        handler: handler!(console_ops::set_open_encoding),
        arity: Arity::exactly(1),
        doc: "open_encoding label: encoding used when opening",
    },
    CommandSpec {
        name: "venv",
        handler: handler!(console_ops::show_venv),
        arity: Arity::exactly(0),
        doc: "show the active virtual environment ($VIRTUAL_ENV)",
    },
    CommandSpec {
        name: "set_sort",
        handler: handler!(dir_ops::set_sort),
        arity: Arity::exactly(1),
        doc: "set_sort name|size|update: order of the directory listing",
    },
    CommandSpec {
        name: "reverse",
        handler: handler!(dir_ops::toggle_reverse),
        arity: Arity::exactly(0),
        doc: "reverse the directory listing order",
    },
    CommandSpec {
        name: "size2",
        handler: handler!(file_ops::dir_size),
        arity: Arity::exactly(1),
        doc: "size2 name: total size of a file or directory tree",
    },
];
