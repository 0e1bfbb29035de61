use crate::model::{BasicInfo, ResumeDraft};
use crate::section::{ListSection, Section};

/// Renders the draft as a markdown document. Empty sections are omitted.
pub fn render_markdown(draft: &ResumeDraft) -> String {
    let info = &draft.basic_info;
    let mut md = String::new();

    let name = if info.name.trim().is_empty() {
        "Resume"
    } else {
        info.name.trim()
    };
    md.push_str(&format!("# {name}\n\n"));

    let contact_line: Vec<&str> = [
        info.contact.as_str(),
        info.email.as_str(),
        info.address.as_str(),
        info.linkedin.as_str(),
        info.github.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
    if !contact_line.is_empty() {
        md.push_str(&contact_line.join(" | "));
        md.push_str("\n\n");
    }
    if !info.objective.trim().is_empty() {
        md.push_str(&format!("## Objective\n\n{}\n\n", info.objective.trim()));
    }

    if !draft.education.is_empty() {
        md.push_str(&format!("## {}\n\n", Section::Education.label()));
        for entry in &draft.education {
            md.push_str(&format!("### {} in {}\n", entry.degree, entry.field_of_study));
            md.push_str(&format!("- **Institute:** {}, {}\n", entry.institute, entry.location));
            md.push_str(&format!(
                "- **Period:** {}\n",
                period(&entry.start_date, &entry.end_date)
            ));
            if let Some(cgpa) = &entry.cgpa {
                md.push_str(&format!("- **CGPA:** {cgpa}\n"));
            }
            md.push('\n');
        }
    }

    if !draft.work_experience.is_empty() {
        md.push_str(&format!("## {}\n\n", Section::WorkExperience.label()));
        for entry in &draft.work_experience {
            md.push_str(&format!("### {}, {}\n", entry.designation, entry.company));
            md.push_str(&format!(
                "- **Period:** {}\n\n",
                period(&entry.start_date, &entry.end_date)
            ));
        }
    }

    let skills = &draft.skills;
    if !(skills.technical.is_empty() && skills.soft.is_empty() && skills.additional.is_empty()) {
        md.push_str(&format!("## {}\n\n", Section::Skills.label()));
        for (title, items) in [
            ("Technical", &skills.technical),
            ("Soft", &skills.soft),
            ("Additional", &skills.additional),
        ] {
            if !items.is_empty() {
                md.push_str(&format!("- **{title}:** {}\n", items.join(", ")));
            }
        }
        md.push('\n');
    }

    for list in [
        ListSection::Achievements,
        ListSection::Projects,
        ListSection::Extracurricular,
        ListSection::Leadership,
    ] {
        let items = draft.list(list);
        if items.is_empty() {
            continue;
        }
        md.push_str(&format!("## {}\n\n", Section::from(list).label()));
        for item in items {
            md.push_str(&format!("- {item}\n"));
        }
        md.push('\n');
    }

    md
}

/// `jane-doe-resume.md`, or `resume.md` when the name has nothing usable.
pub fn export_file_name(info: &BasicInfo) -> String {
    let slug = info
        .name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume.md".to_string()
    } else {
        format!("{slug}-resume.md")
    }
}

fn period(start: &str, end: &str) -> String {
    let end = if end.trim().is_empty() { "Present" } else { end };
    format!("{start} to {end}")
}
