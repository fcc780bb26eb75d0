//! Locale-aware rendering of conversation-log messages.
//!
//! Structured envelopes render through a per-locale catalog; anything that
//! does not parse as an envelope is treated as plain text and split on
//! newlines. That fallback keeps messages written before the envelope
//! protocol existed displaying correctly and must be preserved.

use serde::{Deserialize, Serialize};

use crate::models::quote_message::MessagePayload;

/// Supported storefront locales. Always an explicit parameter, never
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Bg,
    #[default]
    En,
    Es,
}

impl Locale {
    /// All supported locales, for exhaustive rendering tests.
    pub const ALL: [Locale; 3] = [Locale::Bg, Locale::En, Locale::Es];

    /// Parses a locale tag, defaulting to English for unknown tags.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "bg" => Locale::Bg,
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Bg => write!(f, "bg"),
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
        }
    }
}

struct Catalog {
    accepted: &'static str,
    agreed_price: &'static str,
    coupon_applied: &'static str,
    declined: &'static str,
    counter_offer: &'static str,
}

const EN: Catalog = Catalog {
    accepted: "Offer accepted",
    agreed_price: "Agreed price: {}",
    coupon_applied: "Coupon {code}: {discount} off",
    declined: "Offer declined",
    counter_offer: "Counter-offer",
};

const BG: Catalog = Catalog {
    accepted: "Офертата е приета",
    agreed_price: "Договорена цена: {}",
    coupon_applied: "Купон {code}: {discount} отстъпка",
    declined: "Офертата е отказана",
    counter_offer: "Насрещно предложение",
};

const ES: Catalog = Catalog {
    accepted: "Oferta aceptada",
    agreed_price: "Precio acordado: {}",
    coupon_applied: "Cupón {code}: {discount} de descuento",
    declined: "Oferta rechazada",
    counter_offer: "Contraoferta",
};

fn catalog(locale: Locale) -> &'static Catalog {
    match locale {
        Locale::Bg => &BG,
        Locale::En => &EN,
        Locale::Es => &ES,
    }
}

/// Renders a stored message into display lines for the given locale.
///
/// Never fails: unparseable input falls back to plain-text line splitting.
pub fn localize_message(raw: &str, locale: Locale) -> Vec<String> {
    match MessagePayload::decode(raw) {
        Some(payload) => render_payload(&payload, locale),
        None => raw.lines().map(str::to_string).collect(),
    }
}

fn render_payload(payload: &MessagePayload, locale: Locale) -> Vec<String> {
    let catalog = catalog(locale);
    match payload {
        MessagePayload::Accepted {
            price,
            coupon_code,
            coupon_discount,
        } => {
            let mut lines = vec![catalog.accepted.to_string()];
            if let Some(price) = price {
                lines.push(catalog.agreed_price.replace("{}", price));
            }
            if let (Some(code), Some(discount)) = (coupon_code, coupon_discount) {
                lines.push(
                    catalog
                        .coupon_applied
                        .replace("{code}", code)
                        .replace("{discount}", discount),
                );
            }
            lines
        }
        MessagePayload::Declined { text } => {
            let mut lines = vec![catalog.declined.to_string()];
            if let Some(text) = text {
                lines.push(text.clone());
            }
            lines
        }
        MessagePayload::CounterOffer { text } => {
            vec![catalog.counter_offer.to_string(), text.clone()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_tag("bg"), Locale::Bg);
        assert_eq!(Locale::from_tag("ES"), Locale::Es);
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("de"), Locale::En);
    }

    #[test]
    fn test_accepted_renders_in_every_locale() {
        let raw = MessagePayload::Accepted {
            price: Some("49.99".to_string()),
            coupon_code: Some("SAVE10".to_string()),
            coupon_discount: Some("10%".to_string()),
        }
        .encode()
        .unwrap();

        for locale in Locale::ALL {
            let lines = localize_message(&raw, locale);
            assert_eq!(lines.len(), 3, "locale={locale}");
            assert!(lines[1].contains("49.99"));
            assert!(lines[2].contains("SAVE10"));
            assert!(lines[2].contains("10%"));
        }
    }

    #[test]
    fn test_accepted_without_optionals_is_one_line() {
        for locale in Locale::ALL {
            let lines = localize_message(r#"{"key":"accepted"}"#, locale);
            assert_eq!(lines.len(), 1);
            assert!(!lines[0].is_empty());
        }
    }

    #[test]
    fn test_declined_with_reason() {
        let raw = MessagePayload::Declined {
            text: Some("too expensive".to_string()),
        }
        .encode()
        .unwrap();

        for locale in Locale::ALL {
            let lines = localize_message(&raw, locale);
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[1], "too expensive");
        }
    }

    #[test]
    fn test_counter_offer_renders_text() {
        let raw = MessagePayload::CounterOffer {
            text: "Can you do 40?".to_string(),
        }
        .encode()
        .unwrap();

        for locale in Locale::ALL {
            let lines = localize_message(&raw, locale);
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[1], "Can you do 40?");
        }
    }

    #[test]
    fn test_legacy_plain_text_fallback() {
        for locale in Locale::ALL {
            let lines = localize_message("Hello,\nwe can print this by Friday.", locale);
            assert_eq!(
                lines,
                vec!["Hello,".to_string(), "we can print this by Friday.".to_string()]
            );
        }
    }

    #[test]
    fn test_unrecognized_key_falls_back_to_plain_text() {
        let raw = r#"{"key":"refunded","amount":"5.00"}"#;
        let lines = localize_message(raw, Locale::En);
        assert_eq!(lines, vec![raw.to_string()]);
    }

    #[test]
    fn test_locales_differ() {
        let raw = MessagePayload::Declined { text: None }.encode().unwrap();
        let en = localize_message(&raw, Locale::En);
        let bg = localize_message(&raw, Locale::Bg);
        let es = localize_message(&raw, Locale::Es);
        assert_ne!(en, bg);
        assert_ne!(en, es);
        assert_ne!(bg, es);
    }
}
