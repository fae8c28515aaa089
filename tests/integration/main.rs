mod common;
mod logging;
mod process;
