//! CLI to Config conversion utilities

use crate::config::cli::{BroadcastArg, ModeArg, NormalizationArg};
use crate::config::BroadcastBackend;
use crate::distribution::powerlaw::Normalization;
use crate::generator::{EdgeDirection, GeneratorMode};

/// Convert the CLI mode value to the generator mode
pub fn convert_mode(mode: ModeArg) -> GeneratorMode {
    match mode {
        ModeArg::Exact => GeneratorMode::Exact,
        ModeArg::Approximate => GeneratorMode::Approximate,
    }
}

/// Convert the CLI normalization value
pub fn convert_normalization(normalization: NormalizationArg) -> Normalization {
    match normalization {
        NormalizationArg::Full => Normalization::Full,
        NormalizationArg::Legacy => Normalization::Legacy,
    }
}

/// Convert the CLI broadcast value
pub fn convert_broadcast(broadcast: BroadcastArg) -> BroadcastBackend {
    match broadcast {
        BroadcastArg::Memory => BroadcastBackend::Memory,
        BroadcastArg::File => BroadcastBackend::File,
    }
}

/// `--symmetric` is a plain flag, so it can only switch symmetry on
pub fn convert_direction(symmetric: bool) -> Option<EdgeDirection> {
    symmetric.then_some(EdgeDirection::Symmetric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ModeArg::Exact, GeneratorMode::Exact)]
    #[case(ModeArg::Approximate, GeneratorMode::Approximate)]
    fn test_convert_mode(#[case] arg: ModeArg, #[case] expected: GeneratorMode) {
        assert_eq!(convert_mode(arg), expected);
    }

    #[rstest]
    #[case(NormalizationArg::Full, Normalization::Full)]
    #[case(NormalizationArg::Legacy, Normalization::Legacy)]
    fn test_convert_normalization(#[case] arg: NormalizationArg, #[case] expected: Normalization) {
        assert_eq!(convert_normalization(arg), expected);
    }

    #[test]
    fn test_convert_direction() {
        assert_eq!(convert_direction(true), Some(EdgeDirection::Symmetric));
        assert_eq!(convert_direction(false), None);
    }

    #[test]
    fn test_convert_broadcast() {
        assert_eq!(convert_broadcast(BroadcastArg::Memory), BroadcastBackend::Memory);
        assert_eq!(convert_broadcast(BroadcastArg::File), BroadcastBackend::File);
    }
}
