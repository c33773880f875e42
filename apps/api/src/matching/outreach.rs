//! Outreach Composer: templated recruiting message built from a match result.

/// Renders the outreach message for a candidate.
///
/// A named candidate (uploaded resume) gets the personal template; `None` or a
/// blank name (pasted profile text) gets the profile template. An empty
/// `matched` list renders as an empty string in either template.
pub fn compose(candidate_name: Option<&str>, matched: &[String], job_title: &str) -> String {
    let skills = matched.join(", ");

    match candidate_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!(
            "Hi {name}, your experience with {skills} aligns well with our {job_title} role. Let's connect!"
        ),
        None => format!(
            "Hi, your LinkedIn profile shows great alignment with our {job_title} role, especially in {skills}."
        ),
    }
}
