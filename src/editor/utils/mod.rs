pub mod archive;
pub mod path_resolver;
pub mod size;
pub mod text;
