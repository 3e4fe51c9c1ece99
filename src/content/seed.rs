//! Demo catalogue for fresh installs and local development

use tracing::info;

use super::{
    ContentCounts, ContentStore, Document, Event, EventDraft, GalleryDraft, GalleryImage, Project,
    ProjectDraft, TeamDraft, TeamMember,
};
use crate::errors::Result;

const PROJECTS: &[(&str, &str, &[&str])] = &[
    (
        "Neural Market Predictor",
        "LSTM-based stock market prediction using sentiment analysis and technical indicators.",
        &["Deep Learning", "LSTM", "Finance", "Python"],
    ),
    (
        "AI Health Diagnostics",
        "Computer vision model for medical image analysis and disease detection.",
        &["Computer Vision", "CNN", "Healthcare", "TensorFlow"],
    ),
    (
        "Smart Campus Analytics",
        "Real-time campus data analysis dashboard with predictive modeling.",
        &["Data Viz", "Dashboard", "IoT", "React"],
    ),
    (
        "NLP Sentiment Engine",
        "Advanced sentiment analysis for social media monitoring and brand insights.",
        &["NLP", "BERT", "Sentiment", "API"],
    ),
    (
        "Climate Data Visualizer",
        "Interactive visualization platform for climate change data and trends.",
        &["Data Viz", "Climate", "D3.js", "Python"],
    ),
    (
        "Autonomous Navigation AI",
        "Reinforcement learning model for autonomous robot navigation in complex environments.",
        &["RL", "Robotics", "AI", "Simulation"],
    ),
    (
        "Medical Chatbot",
        "Conversational AI for patient triage and health advice.",
        &["Chatbot", "Healthcare", "NLP", "Node.js"],
    ),
    (
        "Retail Demand Forecaster",
        "Time series forecasting for retail inventory optimization.",
        &["Forecasting", "Retail", "Time Series", "Pandas"],
    ),
];

const PROJECT_REPO: &str = "https://github.com";

/// (title, date, time, venue, description)
const EVENTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "AI Summit",
        "March 15, 2024",
        "2:00 PM - 5:00 PM",
        "Data Lab, Room 301",
        "Deep dive into neural networks and practical implementation using PyTorch. Perfect for beginners and intermediate learners.",
    ),
    (
        "Data Visualization Bootcamp",
        "March 22, 2024",
        "1:00 PM - 4:00 PM",
        "Computer Lab B",
        "Master the art of data storytelling with D3.js, Plotly, and advanced visualization techniques.",
    ),
    (
        "ML Competition Finals",
        "April 5, 2024",
        "10:00 AM - 6:00 PM",
        "Main Auditorium",
        "Present your machine learning projects and compete for the grand prize. Open to all skill levels.",
    ),
    (
        "Industry Expert Talk",
        "April 12, 2024",
        "3:00 PM - 5:00 PM",
        "Lecture Hall 1",
        "Learn from industry professionals about real-world applications of data science in tech companies.",
    ),
    (
        "Hackathon Weekend",
        "April 19-21, 2024",
        "48 hours",
        "Innovation Hub",
        "Build innovative data science solutions in teams. Food, mentorship, and prizes provided!",
    ),
    (
        "Research Paper Workshop",
        "May 3, 2024",
        "2:30 PM - 5:30 PM",
        "Research Center",
        "Learn how to write and publish your first data science research paper with guidance from faculty.",
    ),
    (
        "Data Ethics Panel",
        "May 10, 2024",
        "4:00 PM - 6:00 PM",
        "Auditorium B",
        "Panel discussion on ethics in AI and data science.",
    ),
    (
        "Startup Pitch Night",
        "May 17, 2024",
        "6:00 PM - 9:00 PM",
        "Startup Hub",
        "Pitch your data-driven startup ideas to investors.",
    ),
];

/// (name, role, unsplash photo id)
const TEAM: &[(&str, &str, &str)] = &[
    ("Dr. Sarah Chen", "Lead Data Scientist", "1494790108755-2616b612b786"),
    ("Alex Rodriguez", "ML Engineer", "1507003211169-0a1dd7228f2d"),
    ("Priya Patel", "Research Analyst", "1438761681033-6461ffad8d80"),
    ("Michael Lee", "Data Engineer", "1511367461989-f85a21fda167"),
    ("Emily Davis", "Statistician", "1529626455594-4ff0802cfb7e"),
    ("Ravi Kumar", "AI Product Manager", "1517841905240-472988babdf9"),
    ("Sophia Turner", "UX Researcher", "1465101046530-73398c7f28ca"),
    ("Carlos Mendez", "Cloud Architect", "1508214751196-bcfd4ca60f91"),
];

/// (unsplash photo id, alt, title)
const GALLERY: &[(&str, &str, &str)] = &[
    ("1551288049-bebda4e38f71", "Data Science Workshop", "Workshop Session"),
    ("1516321318423-f06f85e504b3", "Team Collaboration", "Team Meeting"),
    ("1551288049-bebda4e38f71", "Hackathon Event", "Hackathon 2024"),
    ("1465101178521-c1a9136a3b43", "Panel Discussion", "AI Ethics Panel"),
    ("1506744038136-46273834b3fb", "Networking Night", "Startup Pitch Night"),
    ("1511367461989-f85a21fda167", "Research Workshop", "Research Paper Workshop"),
    ("1529626455594-4ff0802cfb7e", "Bootcamp", "Data Viz Bootcamp"),
    ("1517841905240-472988babdf9", "Team Building", "Team Building Retreat"),
];

fn portrait_url(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?w=400&h=400&fit=crop&crop=face")
}

fn gallery_url(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?w=600&h=400&fit=crop")
}

/// Seed the demo catalogue if the public collections are empty.
///
/// Returns `None` when content already exists.
pub fn seed_demo(store: &ContentStore) -> Result<Option<ContentCounts>> {
    if !store.is_content_empty() {
        info!("Content already present, skipping demo seed");
        return Ok(None);
    }
    insert_demo(store).map(Some)
}

/// Clear all content and seed the demo catalogue. Admin accounts survive.
pub fn reseed(store: &ContentStore) -> Result<ContentCounts> {
    store.clear_content();
    insert_demo(store)
}

fn insert_demo(store: &ContentStore) -> Result<ContentCounts> {
    // Inserted last-to-first so listings (newest first) match catalogue order
    for (title, description, tags) in PROJECTS.iter().rev() {
        store.create::<Project>(ProjectDraft {
            title: title.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            github: Some(PROJECT_REPO.to_string()),
        })?;
    }

    for (title, date, time, venue, description) in EVENTS.iter().rev() {
        store.create::<Event>(EventDraft {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            venue: venue.to_string(),
            description: description.to_string(),
        })?;
    }

    for (name, role, photo) in TEAM.iter().rev() {
        store.create::<TeamMember>(TeamDraft {
            name: name.to_string(),
            role: role.to_string(),
            image: Some(portrait_url(photo)),
        })?;
    }

    for (photo, alt, title) in GALLERY.iter().rev() {
        store.create::<GalleryImage>(GalleryDraft {
            src: gallery_url(photo),
            alt: alt.to_string(),
            title: title.to_string(),
        })?;
    }

    let counts = store.counts();
    info!(
        "Seeded demo content: {} projects, {} events, {} team, {} gallery",
        counts.projects, counts.events, counts.team, counts.gallery
    );
    Ok(counts)
}

/// Titles in catalogue order, for callers that need to check seeding.
pub fn demo_titles<D: Document>() -> Vec<&'static str> {
    match D::COLLECTION {
        super::Collection::Projects => PROJECTS.iter().map(|p| p.0).collect(),
        super::Collection::Events => EVENTS.iter().map(|e| e.0).collect(),
        super::Collection::Team => TEAM.iter().map(|t| t.0).collect(),
        super::Collection::Gallery => GALLERY.iter().map(|g| g.2).collect(),
        super::Collection::Forms => Vec::new(),
    }
}
