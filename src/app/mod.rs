// Presentation layer: turns simulation reports into text, JSON and share links.

pub mod report;
