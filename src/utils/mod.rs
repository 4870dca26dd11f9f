pub mod array_format;
