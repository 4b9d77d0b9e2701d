//! Flags shared across the command tree

use clap::{Arg, ArgAction, ArgMatches};

pub const DEBUG: &str = "debug";

/// `-d/--debug`, repeatable, accepted by every command.
pub fn debug() -> Arg {
    Arg::new(DEBUG)
        .short('d')
        .long("debug")
        .action(ArgAction::Count)
        .global(true)
        .help("Increase log verbosity (-d info, -dd debug, -ddd trace)")
}

/// Number of `-d` flags given; 0 when the command does not declare it.
pub fn verbosity(matches: &ArgMatches) -> u8 {
    matches
        .try_get_one::<u8>(DEBUG)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;
    use rstest::rstest;

    #[rstest]
    #[case(&["mcd"], 0)]
    #[case(&["mcd", "-d"], 1)]
    #[case(&["mcd", "-dd"], 2)]
    #[case(&["mcd", "--debug", "-d", "-d"], 3)]
    fn test_verbosity(#[case] argv: &[&str], #[case] expected: u8) {
        let matches = Command::new("mcd").arg(debug()).get_matches_from(argv);
        assert_eq!(verbosity(&matches), expected);
    }

    #[test]
    fn given_command_without_debug_flag_when_verbosity_then_zero() {
        let matches = Command::new("mcd").get_matches_from(["mcd"]);
        assert_eq!(verbosity(&matches), 0);
    }
}
