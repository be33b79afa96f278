//! Frequently asked questions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqCategory {
    pub category: &'static str,
    pub items: Vec<FaqEntry>,
}

const fn entry(question: &'static str, answer: &'static str) -> FaqEntry {
    FaqEntry { question, answer }
}

static ORDERS: [FaqEntry; 3] = [
    entry(
        "How do I track my order?",
        "Open 'My Orders' in your account and pick the order to see its current status.",
    ),
    entry(
        "Can I modify or cancel my order?",
        "Orders can be changed or cancelled within 1 hour of placing them. After that, contact customer support.",
    ),
    entry(
        "What payment methods do you accept?",
        "Orders are currently paid by cash on delivery.",
    ),
];

static PRODUCTS: [FaqEntry; 3] = [
    entry(
        "What materials are used in your products?",
        "Our socks use a premium cotton blend chosen for comfort and durability.",
    ),
    entry(
        "Are your products machine washable?",
        "Yes. Wash in cold water and air dry for the longest life.",
    ),
    entry(
        "Do you offer different pack sizes?",
        "Every style comes in 3-pair and 5-pair packs, each with its own price.",
    ),
];

static SHIPPING: [FaqEntry; 3] = [
    entry(
        "How long does shipping take?",
        "Orders are usually delivered within 7 days of being placed.",
    ),
    entry(
        "Do you ship internationally?",
        "We currently ship only within India.",
    ),
    entry(
        "What is your return policy?",
        "Unused products in their original packaging can be returned within 30 days for a refund or exchange.",
    ),
];

static ACCOUNT: [FaqEntry; 3] = [
    entry(
        "How do I reset my password?",
        "Use the 'Forgot Password' link on the sign-in screen and follow the emailed instructions.",
    ),
    entry(
        "How can I contact customer support?",
        "Use the chat assistant in the app or the 'Contact Us' section during business hours.",
    ),
    entry(
        "Is my personal information secure?",
        "Account details are stored securely and never shared with third parties without consent.",
    ),
];

/// The full FAQ, grouped by category.
pub fn all() -> Vec<FaqCategory> {
    vec![
        FaqCategory { category: "Orders", items: ORDERS.to_vec() },
        FaqCategory { category: "Products", items: PRODUCTS.to_vec() },
        FaqCategory { category: "Shipping & Returns", items: SHIPPING.to_vec() },
        FaqCategory { category: "Account & Support", items: ACCOUNT.to_vec() },
    ]
}

/// Entries whose question or answer contains `query`, ignoring case.
/// Categories with no match are dropped; a blank query returns everything.
pub fn search(query: &str) -> Vec<FaqCategory> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return all();
    }

    all()
        .into_iter()
        .filter_map(|mut category| {
            category.items.retain(|e| {
                e.question.to_lowercase().contains(&needle)
                    || e.answer.to_lowercase().contains(&needle)
            });
            (!category.items.is_empty()).then_some(category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_returns_all() {
        assert_eq!(search("  ").len(), 4);
    }

    #[test]
    fn test_search_drops_empty_categories() {
        let hits = search("WASH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "Products");
        assert_eq!(hits[0].items.len(), 1);
    }

    #[test]
    fn test_search_matches_answers() {
        let hits = search("india");
        assert_eq!(hits[0].category, "Shipping & Returns");
        assert!(search("zzz-nothing").is_empty());
    }
}
