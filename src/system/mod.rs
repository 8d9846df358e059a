//! # System Interaction Layer
//!
//! The boundary between the core logic and the operating system's process
//! machinery.
//!
//! - **`supervisor`**: launches one tagged script execution through the
//!   platform shell and observes its completion exactly once, regardless of
//!   how many completion signals the host delivers or in what order.

pub mod supervisor;
