use nix::sys::signal::{SigHandler, Signal, signal};

use marsh::config::ConfigLoader;
use marsh::logging;
use marsh::repl;

fn main() {
    logging::init();

    // An interactive interrupt must not kill the shell itself; forked
    // children install the default action again before exec.
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigIgn);
    }

    let config = ConfigLoader::load();
    repl::start(&config);
}
