use super::Department;

/// Historical spellings seen in stored applicant documents. Matching is case-sensitive here;
/// the registry derives its own lowercase index for the case-insensitive pass.
pub(super) const DEPARTMENT_ALIASES: &[(&str, Department)] = &[
    // AI / ML
    ("aiMl", Department::AiMl),
    ("aiML", Department::AiMl),
    ("ai_ml", Department::AiMl),
    ("aiml", Department::AiMl),
    ("ai", Department::AiMl),
    ("ml", Department::AiMl),
    ("AI/ML", Department::AiMl),
    ("machine-learning", Department::AiMl),
    ("artificial-intelligence", Department::AiMl),
    // Development
    ("development", Department::Dev),
    ("webDev", Department::Dev),
    ("web_dev", Department::Dev),
    ("web-dev", Department::Dev),
    ("web", Department::Dev),
    ("app-dev", Department::Dev),
    ("tech", Department::Dev),
    // Open source
    ("openSource", Department::OpenSource),
    ("open_source", Department::OpenSource),
    ("opensource", Department::OpenSource),
    ("oss", Department::OpenSource),
    // Game development
    ("gameDev", Department::GameDev),
    ("game_dev", Department::GameDev),
    ("gamedev", Department::GameDev),
    ("game-development", Department::GameDev),
    ("gaming", Department::GameDev),
    // Cybersecurity
    ("cyberSec", Department::Cybersec),
    ("cyber_sec", Department::Cybersec),
    ("cyber-sec", Department::Cybersec),
    ("cybersecurity", Department::Cybersec),
    ("cyberSecurity", Department::Cybersec),
    ("cyber_security", Department::Cybersec),
    ("cyber-security", Department::Cybersec),
    ("security", Department::Cybersec),
    ("cyber", Department::Cybersec),
    // Robotics
    ("robotic", Department::Robotics),
    ("robots", Department::Robotics),
    ("hardware", Department::Robotics),
    // Events
    ("event", Department::Events),
    ("eventManagement", Department::Events),
    ("event_management", Department::Events),
    ("event-management", Department::Events),
    ("management", Department::Events),
    ("operations", Department::Events),
    // Design
    ("ui-ux", Department::Design),
    ("uiux", Department::Design),
    ("ui_ux", Department::Design),
    ("graphic-design", Department::Design),
    ("graphics", Department::Design),
    ("creative", Department::Design),
    // Marketing
    ("pr", Department::Marketing),
    ("public-relations", Department::Marketing),
    ("outreach", Department::Marketing),
    ("sponsorship", Department::Marketing),
    // Social media
    ("socialMedia", Department::SocialMedia),
    ("social_media", Department::SocialMedia),
    ("socialmedia", Department::SocialMedia),
    ("social", Department::SocialMedia),
    ("smm", Department::SocialMedia),
    ("content", Department::SocialMedia),
];
