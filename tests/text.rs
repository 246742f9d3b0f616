mod tests {
    use strip_patterns::color::{BLACK, BLUE, Color, LIGHT_BLUE, RANDOM_PRIMARY, RED};
    use strip_patterns::pattern::{PatternDescriptor, PatternKind};
    use strip_patterns::text::{
        TextError, color_to_string, pattern_to_string, string_to_color, string_to_pattern,
    };

    #[test]
    fn test_color_to_string_prefers_palette_names() {
        assert_eq!(color_to_string(RED).as_str(), "RED");
        assert_eq!(color_to_string(BLACK).as_str(), "BLACK");
        assert_eq!(color_to_string(LIGHT_BLUE).as_str(), "LIGHT_BLUE");
        assert_eq!(color_to_string(RANDOM_PRIMARY).as_str(), "RANDOM_PRIMARY");
    }

    #[test]
    fn test_color_to_string_hex_form() {
        let color = Color {
            special: 0,
            red: 0x5F,
            green: 0x10,
            blue: 0x00,
        };
        assert_eq!(color_to_string(color).as_str(), "0x005F1000");
    }

    #[test]
    fn test_string_to_color_palette_names_case_sensitive() {
        assert_eq!(string_to_color("RED"), RED);
        assert_eq!(string_to_color("red"), BLACK);
        assert_eq!(string_to_color("Red"), BLACK);
    }

    #[test]
    fn test_string_to_color_hex() {
        assert_eq!(string_to_color("0x00FF0000"), RED);
        assert_eq!(string_to_color("0X000000FF"), BLUE);
        // Hex digits themselves are case-insensitive.
        assert_eq!(
            string_to_color("0x00aabbcc"),
            Color {
                special: 0,
                red: 0xAA,
                green: 0xBB,
                blue: 0xCC,
            }
        );
        // The special byte rides along.
        assert_eq!(string_to_color("0x01000000").special, 1);
    }

    #[test]
    fn test_string_to_color_rejects_malformed() {
        assert_eq!(string_to_color(""), BLACK);
        assert_eq!(string_to_color("0xFFF"), BLACK);
        assert_eq!(string_to_color("0XZZZZZZZZ"), BLACK);
        assert_eq!(string_to_color("00FF000000"), BLACK);
        assert_eq!(string_to_color("0x00FF00000"), BLACK);
    }

    #[test]
    fn test_color_string_round_trip() {
        for color in [
            RED,
            BLACK,
            RANDOM_PRIMARY,
            Color {
                special: 0,
                red: 0x12,
                green: 0x34,
                blue: 0x56,
            },
            Color {
                special: 2,
                red: 1,
                green: 2,
                blue: 3,
            },
        ] {
            let text = color_to_string(color);
            assert_eq!(string_to_color(&text), color, "via {text}");
        }
    }

    #[test]
    fn test_pattern_to_string() {
        let descriptor = PatternDescriptor::new(PatternKind::Cylon, BLUE, BLACK, 1000);
        assert_eq!(
            pattern_to_string(&descriptor).as_str(),
            "CYLON,BLUE,BLACK,1000"
        );
    }

    #[test]
    fn test_string_to_pattern_round_trip() {
        let descriptor = PatternDescriptor::new(
            PatternKind::Flicker,
            Color {
                special: 0,
                red: 0x5F,
                green: 0x10,
                blue: 0x00,
            },
            BLACK,
            200,
        );
        let text = pattern_to_string(&descriptor);
        assert_eq!(text.as_str(), "FLICKER,0x005F1000,BLACK,200");
        assert_eq!(string_to_pattern(&text), Ok(descriptor));
    }

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(
            string_to_pattern("SOLID").map_err(TextError::code),
            Err(-1)
        );
        assert_eq!(
            string_to_pattern(",RED,BLUE,100").map_err(TextError::code),
            Err(-1)
        );
        assert_eq!(
            string_to_pattern("UNKNOWN,RED,BLUE,100").map_err(TextError::code),
            Err(-2)
        );
        assert_eq!(
            string_to_pattern("SOLID,RED").map_err(TextError::code),
            Err(-3)
        );
        assert_eq!(
            string_to_pattern("SOLID,RED,BLUE").map_err(TextError::code),
            Err(-4)
        );
        assert_eq!(
            string_to_pattern("SOLID,RED,BLUE,-100").map_err(TextError::code),
            Err(-5)
        );
    }

    #[test]
    fn test_short_hex_color_does_not_eat_the_delimiter() {
        // A hex field is ten characters; "0x00" swallows the comma that
        // would otherwise terminate it, so the third delimiter is missing.
        assert_eq!(
            string_to_pattern("CYLON,RED,0x00,1000").map_err(TextError::code),
            Err(-4)
        );
    }

    #[test]
    fn test_malformed_colors_become_black() {
        let descriptor = string_to_pattern("SOLID,notacolor,0xZZZZZZZZ,50").unwrap();
        assert_eq!(descriptor.a, BLACK);
        assert_eq!(descriptor.b, BLACK);
        assert_eq!(descriptor.speed, 50);
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let descriptor = string_to_pattern("SOLID,RED,BLACK,100 and then some").unwrap();
        assert_eq!(descriptor.speed, 100);

        let descriptor = string_to_pattern("SOLID,RED,BLACK,100,extra,fields").unwrap();
        assert_eq!(descriptor.speed, 100);
    }

    #[test]
    fn test_unparseable_speed_reads_as_zero() {
        let descriptor = string_to_pattern("SOLID,RED,BLACK,fast").unwrap();
        assert_eq!(descriptor.speed, 0);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            PatternKind::Solid,
            PatternKind::Pulse,
            PatternKind::Cylon,
            PatternKind::Alternate,
            PatternKind::Flicker,
            PatternKind::Lava,
            PatternKind::Test,
        ] {
            assert_eq!(PatternKind::parse_from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PatternKind::parse_from_str("solid"), None);
    }
}
