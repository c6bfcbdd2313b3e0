mod catalog;

pub use catalog::{read_directories, read_directory, Catalog, CatalogEntry};
