// Library entry exposing front-end modules.
pub mod assembler;
pub mod core;
pub mod report;
