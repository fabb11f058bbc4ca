
#[cfg(test)]
mod tests {
    use super::test_helpers::{cents, create_extractor};
    use pocket_tally::price_recognition::{recognize_price, PricePattern, PriceVocabulary};
    use pocket_tally::PriceExtractor;

    #[test]
    fn test_currency_prefixed_amounts() {
        let extractor = create_extractor();

        assert_eq!(extractor.extract("$5.99"), cents(599));
        assert_eq!(extractor.extract("$ 5"), cents(500));
        assert_eq!(extractor.extract("Apples $12.5 each"), cents(1250));
        assert_eq!(extractor.extract("costs $3"), cents(300));
    }

    #[test]
    fn test_currency_prefixed_amount_is_exact() {
        let extractor = create_extractor();

        for amount in ["0", "0.05", "0.99", "1", "7.5", "12.34", "999999.99"] {
            let expected = pocket_tally::Price::parse_decimal(amount);
            assert!(expected.is_some());
            assert_eq!(extractor.extract(&format!("${}", amount)), expected);
            assert_eq!(
                extractor.extract(&format!("Olive oil ${} organic", amount)),
                expected,
                "amount {} inside text",
                amount
            );
        }
    }

    #[test]
    fn test_currency_words_are_case_insensitive() {
        let extractor = create_extractor();

        assert_eq!(extractor.extract("5 dollars"), cents(500));
        assert_eq!(extractor.extract("Pizza 12 Dollars"), cents(1200));
        assert_eq!(extractor.extract("3 BUCKS"), cents(300));
        assert_eq!(extractor.extract("tip 1 buck"), cents(100));
        assert_eq!(extractor.extract("for 10 dollars"), cents(1000));
    }

    #[test]
    fn test_cost_keywords() {
        let extractor = create_extractor();

        let found = extractor.extract_detailed("cheese costs 4").unwrap();
        assert_eq!(found.pattern, PricePattern::CostKeyword);
        assert_eq!(found.price.cents(), 400);

        assert_eq!(extractor.extract("Coffee @ 2.50"), cents(250));
        assert_eq!(extractor.extract("PRICE 7"), cents(700));
        assert_eq!(extractor.extract("Batteries at 4"), cents(400));
        assert_eq!(extractor.extract("Ham priced $6.25"), cents(625));
    }

    #[test]
    fn test_trailing_two_decimal_amount() {
        let extractor = create_extractor();

        let found = extractor.extract_detailed("Milk 3.99").unwrap();
        assert_eq!(found.pattern, PricePattern::TrailingDecimal);
        assert_eq!(found.price.cents(), 399);
        assert_eq!(found.span, 5..9);

        assert_eq!(extractor.extract("Milk 3.99   "), cents(399));
        assert_eq!(extractor.extract("Café crème 3.50"), cents(350));
        assert_eq!(extractor.extract("Milk 399"), None);
        assert_eq!(extractor.extract("Milk 3.9"), None);
        assert_eq!(extractor.extract("3.99 Milk"), None);
    }

    #[test]
    fn test_quantity_times_unit_price() {
        let extractor = create_extractor();

        let found = extractor.extract_detailed("2 x $3.50").unwrap();
        assert_eq!(found.pattern, PricePattern::QuantityTimesUnit);
        assert_eq!(found.price.cents(), 700);

        assert_eq!(extractor.extract("2X3.5"), cents(700));
        assert_eq!(extractor.extract("Yogurt 4 x 1.25"), cents(500));
        assert_eq!(extractor.extract("3 × 2"), cents(600));
    }

    #[test]
    fn test_overflowing_product_is_no_match() {
        let extractor = create_extractor();

        assert_eq!(extractor.extract("99999999999999999 x 999"), None);

        // The cascade carries on to the bundle keyword
        let found = extractor
            .extract_detailed("99999999999999999 x 999, 3 for 10")
            .unwrap();
        assert_eq!(found.pattern, PricePattern::BundleFor);
        assert_eq!(found.price.cents(), 1000);
    }

    #[test]
    fn test_unparseable_quantity_uses_unit_price() {
        let extractor = create_extractor();

        let found = extractor
            .extract_detailed("99999999999999999999 x $3")
            .unwrap();
        assert_eq!(found.pattern, PricePattern::QuantityTimesUnit);
        assert_eq!(found.price.cents(), 300);
        assert_eq!(found.span, 0..25);
    }

    #[test]
    fn test_bundle_price() {
        let extractor = create_extractor();

        let found = extractor.extract_detailed("3 avocados for 5").unwrap();
        assert_eq!(found.pattern, PricePattern::BundleFor);
        assert_eq!(found.price.cents(), 500);

        assert_eq!(extractor.extract("two for $10"), cents(1000));
    }

    #[test]
    fn test_first_pattern_wins() {
        let extractor = create_extractor();

        // Currency symbol beats the later currency word
        assert_eq!(extractor.extract("Eggs $2 or 5 dollars"), cents(200));
        // Cost keyword beats the trailing decimal
        assert_eq!(extractor.extract("Milk costs 4 not 3.99"), cents(400));
        // Trailing decimal beats the bundle keyword
        assert_eq!(extractor.extract("for 2 people 8.40"), cents(840));
    }

    #[test]
    fn test_no_price() {
        let extractor = create_extractor();

        assert_eq!(extractor.extract(""), None);
        assert_eq!(extractor.extract("   "), None);
        assert_eq!(extractor.extract("Bread"), None);
        assert_eq!(extractor.extract("3 apples"), None);
        assert_eq!(extractor.extract("Pick up kids at school"), None);
    }

    #[test]
    fn test_extract_matches_detailed() {
        let extractor = create_extractor();

        for text in ["$4", "Milk 3.99", "Bread", "2 x 3", "for 1"] {
            assert_eq!(
                extractor.extract(text),
                extractor.extract_detailed(text).map(|m| m.price)
            );
        }
        assert_eq!(recognize_price("Cereal $4.49"), cents(449));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = PriceVocabulary {
            currency_symbols: vec!["€".to_string(), "$".to_string()],
            currency_words: vec!["euros".to_string(), "euro".to_string()],
            ..PriceVocabulary::default()
        };
        let extractor = PriceExtractor::with_vocabulary(vocabulary).unwrap();

        assert_eq!(extractor.extract("Fromage €4.20"), cents(420));
        assert_eq!(extractor.extract("Pain 2 euros"), cents(200));
        assert_eq!(extractor.extract("$3"), cents(300));
        // Not part of this vocabulary any more
        assert_eq!(extractor.extract("5 bucks"), None);
    }

    #[test]
    fn test_invalid_vocabulary_is_rejected() {
        let vocabulary = PriceVocabulary {
            bundle_keywords: vec![],
            ..PriceVocabulary::default()
        };
        assert!(PriceExtractor::with_vocabulary(vocabulary).is_err());
    }

    #[test]
    fn test_regex_metacharacters_in_vocabulary_are_literal() {
        let vocabulary = PriceVocabulary {
            currency_symbols: vec!["US$".to_string(), "(".to_string()],
            ..PriceVocabulary::default()
        };
        let extractor = PriceExtractor::with_vocabulary(vocabulary).unwrap();

        assert_eq!(extractor.extract("Tea US$3"), cents(300));
        assert_eq!(extractor.extract("Tea (3"), cents(300));
        assert_eq!(extractor.extract("Tea 3"), None);
    }
}
