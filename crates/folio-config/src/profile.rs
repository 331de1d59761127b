//! Page content.

use serde::{Deserialize, Serialize};

/// An education or experience milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub title: String,
    pub place: String,
    pub date: String,
    pub description: String,
}

/// A showcased project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub live: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub text: String,
}

/// A labelled link, e.g. an email address or a profile URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub value: String,
    pub href: String,
}

impl ContactLink {
    fn new(label: &str, value: &str, href: &str) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            href: href.into(),
        }
    }
}

/// Everything shown on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub tagline: String,
    /// Roles cycled by the hero typewriter.
    pub roles: Vec<String>,
    pub about: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub testimonials: Vec<Testimonial>,
    pub contact_intro: String,
    pub contacts: Vec<ContactLink>,
    pub footer_note: String,
    pub footer_links: Vec<ContactLink>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Saurabh Pandey".into(),
            tagline: "Frontend Developer & MCA Student".into(),
            roles: strings(&[
                "Frontend Developer",
                "UI Engineer",
                "React Enthusiast",
                "MCA Student",
            ]),
            about: strings(&[
                "I build clean, responsive interfaces with a focus on motion and detail.",
                "Currently pursuing an MCA, specialising in modern frontend development.",
                "I care about accessible markup, smooth interactions and maintainable components.",
            ]),
            timeline: vec![
                TimelineEntry {
                    title: "Master of Computer Applications (MCA)".into(),
                    place: "VIVA School of MCA".into(),
                    date: "2025 – 2027 (Pursuing)".into(),
                    description: "Specializing in frontend development and modern web technologies."
                        .into(),
                },
                TimelineEntry {
                    title: "Bachelor of Science in Information Technology".into(),
                    place: "Abhinav College".into(),
                    date: "2021 – 2024".into(),
                    description: "Graduated with CGPA: 8.10/10. Built strong foundation in programming and web development.".into(),
                },
                TimelineEntry {
                    title: "RE-BOOK – Textbook Resale Platform".into(),
                    place: "College Group Project".into(),
                    date: "2024".into(),
                    description: "Developed complete responsive frontend UI using Laravel, MySQL, and Bootstrap.".into(),
                },
            ],
            skills: strings(&[
                "HTML5",
                "CSS3",
                "JavaScript",
                "React",
                "Tailwind",
                "Bootstrap",
                "Git",
                "Laravel",
            ]),
            projects: vec![Project {
                title: "RE-BOOK".into(),
                description: "Textbook resale platform connecting students who want to buy and sell used books.".into(),
                tech: strings(&["Laravel", "MySQL", "Bootstrap"]),
                live: None,
                source: Some("https://github.com/Saurabh0731".into()),
            }],
            testimonials: vec![
                Testimonial {
                    name: "Project Teammate".into(),
                    role: "Backend Developer".into(),
                    text: "Saurabh delivered a clean, responsive frontend for our RE-BOOK project. His attention to UI detail and smooth user experience improved the entire platform.".into(),
                },
                Testimonial {
                    name: "College Faculty".into(),
                    role: "Professor".into(),
                    text: "Saurabh consistently demonstrates strong frontend fundamentals and a keen eye for user experience. His projects show practical understanding of real-world applications.".into(),
                },
                Testimonial {
                    name: "Peer Developer".into(),
                    role: "Frontend Collaborator".into(),
                    text: "Working with Saurabh was seamless. His structured code and component design made collaboration easy and efficient.".into(),
                },
            ],
            contact_intro: "Open to internships and frontend roles. Drop a message.".into(),
            contacts: vec![
                ContactLink::new(
                    "Email",
                    "saurabhpandey0731@gmail.com",
                    "mailto:saurabhpandey0731@gmail.com",
                ),
                ContactLink::new("GitHub", "Saurabh0731", "https://github.com/Saurabh0731"),
                ContactLink::new(
                    "LinkedIn",
                    "saurabh-pandey-webdev",
                    "https://www.linkedin.com/in/saurabh-pandey-webdev/",
                ),
            ],
            footer_note: "Built with Rust & ratatui".into(),
            footer_links: vec![
                ContactLink::new(
                    "LinkedIn",
                    "saurabh-pandey-webdev",
                    "https://www.linkedin.com/in/saurabh-pandey-webdev/",
                ),
                ContactLink::new("GitHub", "Saurabh0731", "https://github.com/Saurabh0731"),
            ],
        }
    }
}
