use crate::Reporter;

/// The outcome of one named check against one response.
#[derive(Debug, Clone)]
pub struct CheckRecord {
    pub name: String,
    pub passed: bool,
}

/// Evaluate a set of named predicates against a response and record each outcome.
///
/// Checks never alter control flow: a failing check is recorded for the end-of-run report and the
/// threshold evaluation, but the run continues. The return value says whether every check passed,
/// for callers that want to log or count locally.
pub fn check<R>(reporter: &Reporter, subject: &R, checks: &[(&str, fn(&R) -> bool)]) -> bool {
    let mut all_passed = true;
    for (name, predicate) in checks {
        let passed = predicate(subject);
        all_passed &= passed;
        reporter.add_check(CheckRecord {
            name: (*name).to_string(),
            passed,
        });
    }
    all_passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReporterOpt;

    #[test]
    fn records_pass_and_fail_per_name() {
        let reporter = Reporter::new(ReporterOpt::Noop);

        let passed = check(
            &reporter,
            &42_u16,
            &[
                ("is the answer", |v: &u16| *v == 42),
                ("is even", |v: &u16| *v % 2 == 0),
                ("is large", |v: &u16| *v > 100),
            ],
        );

        assert!(!passed);

        let stats = reporter.finalize();
        let by_name = |name: &str| {
            stats
                .checks()
                .iter()
                .find(|c| c.name == name)
                .expect("check not recorded")
                .clone()
        };
        assert_eq!(by_name("is the answer").passes, 1);
        assert_eq!(by_name("is large").fails, 1);
    }

    #[test]
    fn all_passing_checks_return_true() {
        let reporter = Reporter::new(ReporterOpt::Noop);

        let passed = check(&reporter, &201_u16, &[("is status 201", |v: &u16| *v == 201)]);

        assert!(passed);
    }
}
