use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "powerbuttond",
    version,
    about = "Classify power button presses and forward them to Steam"
)]
pub struct Cli {
    /// Input device nodes to watch instead of udev discovery (at most 2 are used)
    #[arg(value_name = "DEVICE")]
    pub devices: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_discovery() {
        let cli = Cli::parse_from(["powerbuttond"]);
        assert!(cli.devices.is_empty());
    }

    #[test]
    fn positional_devices() {
        let cli = Cli::parse_from(["powerbuttond", "/dev/input/event3", "/dev/input/event5"]);
        assert_eq!(
            cli.devices,
            vec![
                PathBuf::from("/dev/input/event3"),
                PathBuf::from("/dev/input/event5")
            ]
        );
    }

    #[test]
    fn flags_are_rejected() {
        assert!(Cli::try_parse_from(["powerbuttond", "--grab"]).is_err());
    }
}
