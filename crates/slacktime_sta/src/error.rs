//! Fatal error types for static timing analysis.
//!
//! Per the propagation policy, the loader is the only source of
//! [`StaError::MalformedNetlist`] and [`StaError::UndefinedSignal`]; the
//! topological orderer is the only source of [`StaError::CycleInCombinational`];
//! the K-path extractor is the only source of [`StaError::NoEndpoints`].
//! Non-fatal findings (`UnknownPrimitive`, `NoPathToEndpoint`) are not part
//! of this enum — they are [`slacktime_diagnostics::Diagnostic`] warnings
//! emitted into a [`slacktime_diagnostics::DiagnosticSink`] instead.

/// Fatal errors that abort a whole STA invocation.
#[derive(Debug, thiserror::Error)]
pub enum StaError {
    /// An expression or instance in the netlist could not be parsed or
    /// classified into a known gate pattern.
    #[error("malformed netlist: {0}")]
    MalformedNetlist(String),

    /// An expression referenced an identifier that is neither declared as
    /// an input nor produced by any assignment or instance.
    #[error("undefined signal `{0}`")]
    UndefinedSignal(String),

    /// The combinational subgraph (after DFF splitting) contains a cycle.
    #[error("combinational cycle through signal `{0}`")]
    CycleInCombinational(String),

    /// The timing graph has no endpoints to report slack for.
    #[error("timing graph has no endpoints")]
    NoEndpoints,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_netlist() {
        let err = StaError::MalformedNetlist("unbalanced parentheses".to_string());
        assert_eq!(format!("{err}"), "malformed netlist: unbalanced parentheses");
    }

    #[test]
    fn display_undefined_signal() {
        let err = StaError::UndefinedSignal("foo".to_string());
        assert_eq!(format!("{err}"), "undefined signal `foo`");
    }

    #[test]
    fn display_cycle() {
        let err = StaError::CycleInCombinational("n1".to_string());
        assert_eq!(format!("{err}"), "combinational cycle through signal `n1`");
    }

    #[test]
    fn display_no_endpoints() {
        let err = StaError::NoEndpoints;
        assert_eq!(format!("{err}"), "timing graph has no endpoints");
    }
}
