//! Binary entrypoint for the console chat client.

use std::process::ExitCode;

use modular_chat_client::start_chat_client;

fn main() -> ExitCode {
    start_chat_client::run()
}
