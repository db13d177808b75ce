mod path;


pub use path::{PathError, PathSanitizer};
