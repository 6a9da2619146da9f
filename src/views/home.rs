use super::Navigation;

pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
    pub cta: &'static str,
    pub href: &'static str,
}

pub const CARDS: [FeatureCard; 3] = [
    FeatureCard {
        title: "Monitor Conversations",
        description: "Track user interactions and analyze AI generated responses for quality and safety.",
        cta: "View conversations",
        href: "/conversations",
    },
    FeatureCard {
        title: "Detect Risks",
        description: "Identify risky prompts and responses that require attention and follow up.",
        cta: "Review alerts",
        href: "/alerts",
    },
    FeatureCard {
        title: "Manage Alerts",
        description: "Stay informed with alerts for sensitive or harmful content across models and users.",
        cta: "Open alert center",
        href: "/alerts",
    },
];

pub fn open(position: usize) -> Option<Navigation> {
    position
        .checked_sub(1)
        .and_then(|i| CARDS.get(i))
        .map(|card| Navigation::push(card.href))
}

pub fn render() -> String {
    let mut out = String::new();
    out.push_str("Welcome to chatwatch\n");
    out.push_str("Monitor and review AI conversations with confidence.\n\n");
    out.push_str("  `conversations` to get started, `alerts` to review alerts\n\n");

    for (i, card) in CARDS.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, card.title));
        out.push_str(&format!("    {}\n", card.description));
        out.push_str(&format!("    {} -> {}\n\n", card.cta, card.href));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_link_to_sections() {
        assert_eq!(open(1), Some(Navigation::push("/conversations")));
        assert_eq!(open(3), Some(Navigation::push("/alerts")));
        assert_eq!(open(0), None);
        assert_eq!(open(4), None);
    }

    #[test]
    fn render_lists_every_card() {
        let out = render();
        for card in &CARDS {
            assert!(out.contains(card.title));
        }
    }
}
