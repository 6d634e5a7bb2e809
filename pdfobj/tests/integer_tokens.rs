use pdfobj::{
    parse::{ByteSource, Lexer, Token},
    pdf::Object,
    ObjectReader,
};
use proptest::prelude::*;

fn lex_one(text: &str) -> Token {
    let mut lexer = Lexer::new(ByteSource::new(text.as_bytes()));
    lexer.read_token().unwrap().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Decimal text of any integer, with or without an explicit sign, reads
    /// back as the same integer.
    #[test]
    fn integer_text_reads_back(value in any::<i64>(), plus in any::<bool>()) {
        let text = if plus && value >= 0 {
            format!("+{}", value)
        } else {
            value.to_string()
        };
        prop_assert_eq!(lex_one(&text), Token::Integer(value));
    }

    /// An integer followed by anything that isn't `gen R` or `gen obj` stays
    /// an integer and the rest is read unchanged.
    #[test]
    fn integer_lookahead_preserves_following_tokens(id in 0u32.., gen in 0u16..) {
        let text = format!("{} {} /Next", id, gen);
        let mut reader = ObjectReader::from_bytes(text.as_bytes());
        prop_assert_eq!(reader.parse_object().unwrap().object, Object::Integer(i64::from(id)));
        prop_assert_eq!(reader.parse_object().unwrap().object, Object::Integer(i64::from(gen)));
        prop_assert_eq!(
            reader.parse_object().unwrap().object,
            Object::Name("Next".into())
        );
    }
}
