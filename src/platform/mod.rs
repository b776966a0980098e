pub mod ashby;
pub mod generic;
pub mod greenhouse;
pub mod handler;
pub mod icims;
pub mod lever;
pub mod sections;
pub mod workday;
