//! Risk scorer: a deterministic pure function over the final finding set.
//! Never fails, never reads external state or the clock.

use osint_model::{Finding, RiskLevel, Severity};

/// `(score in [0,100], risk_level)` for one finished scan's finding set.
#[must_use]
pub fn calculate_risk_score(findings: &[Finding]) -> (u8, RiskLevel) {
    let mut score = 0i64;

    score += tier_contribution(findings, Severity::Critical, 25, 50);
    score += tier_contribution(findings, Severity::High, 10, 30);
    score += tier_contribution(findings, Severity::Medium, 3, 15);
    score += tier_contribution(findings, Severity::Low, 1, 5);

    let corpus: Vec<String> = findings.iter().map(Finding::searchable_text).collect();
    let joined = corpus.join(" ");

    if joined.contains("password") && (joined.contains("exposed") || joined.contains("breach")) {
        score += 15;
    }
    if joined.contains("address") && (joined.contains("home") || joined.contains("street") || joined.contains("residence")) {
        score += 15;
    }
    if joined.contains("phone") {
        score += 10;
    }

    let has_name_with_colon = findings.iter().any(|f| {
        let title = f.title().to_lowercase();
        title.contains("name") && title.contains(':')
    });
    let has_location_title = findings.iter().any(|f| f.title().to_lowercase().contains("location"));
    if has_name_with_colon && has_location_title {
        score += 5;
    }

    let account_count = findings.iter().filter(|f| f.kind() == osint_model::FindingType::Account).count();
    if account_count > 10 {
        score += 5;
    }

    let clamped = score.clamp(0, 100) as u8;
    let level = band(clamped);
    (clamped, level)
}

fn tier_contribution(findings: &[Finding], severity: Severity, per_finding: i64, cap: i64) -> i64 {
    let count = findings.iter().filter(|f| f.severity() == severity).count() as i64;
    (count * per_finding).min(cap)
}

fn band(score: u8) -> RiskLevel {
    if score >= 70 {
        RiskLevel::Critical
    } else if score >= 50 {
        RiskLevel::High
    } else if score >= 30 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use osint_model::FindingType;

    use super::*;

    fn finding(kind: FindingType, severity: Severity, title: &str, description: &str) -> Finding {
        Finding::builder(kind, severity).title(title).description(description).build()
    }

    #[test]
    fn empty_finding_set_scores_zero_low() {
        let (score, level) = calculate_risk_score(&[]);
        assert_eq!(score, 0);
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn severity_contributions_are_capped_per_tier() {
        let findings: Vec<_> = (0..10)
            .map(|i| finding(FindingType::PersonalInfo, Severity::High, &format!("finding {i}"), ""))
            .collect();
        let (score, _) = calculate_risk_score(&findings);
        assert_eq!(score, 30);
    }

    #[test]
    fn password_and_breach_bonus_applies() {
        let findings = vec![finding(
            FindingType::Breach,
            Severity::High,
            "Password exposed",
            "Found in a breach.",
        )];
        let (score, level) = calculate_risk_score(&findings);
        assert_eq!(score, 10 + 15);
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn scenario_s2_breached_email_matches_band() {
        let findings = vec![
            finding(FindingType::Breach, Severity::High, "Found in 1 Data Breach(es)", ""),
            finding(
                FindingType::Breach,
                Severity::High,
                "Breach: LinkedIn",
                "exposed data: email, password, phone",
            ),
        ];
        let (score, level) = calculate_risk_score(&findings);
        assert!(score >= 35);
        assert_eq!(level, RiskLevel::Medium);
    }

    #[test]
    fn scorer_is_deterministic() {
        let findings = vec![finding(FindingType::PersonalInfo, Severity::Medium, "x", "y")];
        assert_eq!(calculate_risk_score(&findings), calculate_risk_score(&findings));
    }
}
