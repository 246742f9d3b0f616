mod tests {
    use strip_patterns::color::{
        BLACK, BLUE, Color, GREEN, RANDOM, RANDOM_PRIMARY, RED, WHITE, mix_color,
    };
    use strip_patterns::event::{EventOptions, EventPublisher};
    use strip_patterns::pattern::{Pattern, PatternKind};
    use strip_patterns::rng::{RandomSource, XorShift32};
    use strip_patterns::strip::{BufferedStrip, Strip};
    use strip_patterns::text::TextError;
    use strip_patterns::{Duration, Instant};

    #[derive(Default)]
    struct RecordingPublisher {
        events: Vec<(String, String, EventOptions)>,
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&mut self, name: &str, payload: &str, options: EventOptions) {
            self.events
                .push((name.to_string(), payload.to_string(), options));
        }
    }

    /// Replays a fixed script of draws.
    struct ScriptRng {
        values: Vec<i32>,
        index: usize,
    }

    impl ScriptRng {
        fn new(values: &[i32]) -> Self {
            Self {
                values: values.to_vec(),
                index: 0,
            }
        }
    }

    impl RandomSource for ScriptRng {
        fn random_range(&mut self, low: i32, high: i32) -> i32 {
            let value = self.values[self.index];
            self.index += 1;
            assert!(value >= low && value < high);
            value
        }
    }

    /// Advance exactly to the next due step.
    fn step<S: Strip, R: RandomSource, E: EventPublisher>(pattern: &mut Pattern<S, R, E>) -> bool {
        let at = pattern.next_update_at();
        pattern.update(at)
    }

    fn frame<const N: usize, R: RandomSource, E: EventPublisher>(
        pattern: &Pattern<BufferedStrip<N>, R, E>,
    ) -> [Color; N] {
        let mut pixels = [BLACK; N];
        pixels.copy_from_slice(pattern.strip().pixel_buffer().unwrap());
        pixels
    }

    #[test]
    fn test_first_update_adopts_and_publishes() {
        let mut pattern = Pattern::with_event(
            BufferedStrip::<4>::new(),
            XorShift32::new(1),
            "strip",
            RecordingPublisher::default(),
        );
        pattern.set_pattern(PatternKind::Solid, RED, BLACK, 100);
        assert!(pattern.pending().is_some());

        assert!(pattern.update(Instant::from_millis(0)));
        assert!(pattern.pending().is_none());
        assert_eq!(pattern.active().a, RED);
        // The frame drawn this tick still belonged to the previous
        // descriptor; the adopted one renders from the next step on.
        assert_eq!(frame(&pattern), [BLACK; 4]);

        assert!(!step(&mut pattern));
        assert_eq!(frame(&pattern), [RED; 4]);

        let (_, _, publisher) = pattern.into_parts();
        assert_eq!(
            publisher.events,
            vec![(
                "strip".to_string(),
                "SOLID,RED,BLACK,100".to_string(),
                EventOptions {
                    ttl_seconds: 60,
                    private: true,
                },
            )]
        );
    }

    #[test]
    fn test_update_waits_for_the_due_instant() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(1));
        assert!(!pattern.update(Instant::from_millis(0)));

        pattern.set_pattern(PatternKind::Solid, RED, BLACK, 100);
        assert!(!pattern.update(Instant::from_millis(50)));
        assert!(pattern.pending().is_some());

        assert!(pattern.update(Instant::from_millis(100)));
        assert!(pattern.pending().is_none());
    }

    #[test]
    fn test_overlong_event_name_is_truncated() {
        let name = "n".repeat(40);
        let mut pattern = Pattern::with_event(
            BufferedStrip::<4>::new(),
            XorShift32::new(1),
            &name,
            RecordingPublisher::default(),
        );
        pattern.set_pattern(PatternKind::Solid, RED, BLACK, 100);
        assert!(pattern.update(Instant::from_millis(0)));

        // Publication survives under the first 32 characters.
        let (_, _, publisher) = pattern.into_parts();
        assert_eq!(publisher.events.len(), 1);
        assert_eq!(publisher.events[0].0, "n".repeat(32));
    }

    #[test]
    fn test_unnamed_pattern_publishes_nothing() {
        let mut pattern = Pattern::with_event(
            BufferedStrip::<4>::new(),
            XorShift32::new(1),
            "",
            RecordingPublisher::default(),
        );
        pattern.set_pattern(PatternKind::Solid, RED, BLACK, 100);
        assert!(pattern.update(Instant::from_millis(0)));

        let (_, _, publisher) = pattern.into_parts();
        assert!(publisher.events.is_empty());
    }

    #[test]
    fn test_pulse_midpoint_and_bottom_break() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(2));
        pattern.set_pattern(PatternKind::Pulse, RED, BLUE, 2550);
        step(&mut pattern);

        // 256 steps up the ladder, then 127 back down to position 128.
        for _ in 0..383 {
            step(&mut pattern);
        }
        let expected = mix_color(RED, BLUE, 128.0 / 255.0);
        assert_eq!(frame(&pattern), [expected; 4]);

        // The bottom of the fade is the clean break: 128 more steps.
        pattern.set_pattern(PatternKind::Solid, GREEN, BLACK, 50);
        let mut adopted_after = None;
        for i in 1..=128 {
            if step(&mut pattern) {
                adopted_after = Some(i);
                break;
            }
        }
        assert_eq!(adopted_after, Some(128));
        assert_eq!(frame(&pattern), [RED; 4]);
    }

    #[test]
    fn test_cylon_eye_with_dimmed_edges() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(3));
        pattern.set_pattern(PatternKind::Cylon, WHITE, BLACK, 800);
        step(&mut pattern);

        let edge = mix_color(WHITE, BLACK, 0.95);

        step(&mut pattern);
        assert_eq!(frame(&pattern), [WHITE, edge, BLACK, BLACK]);

        // Off the endpoint the step delay drops back to speed / (2 * count).
        let before = pattern.next_update_at();
        step(&mut pattern);
        assert_eq!(frame(&pattern), [edge, WHITE, edge, BLACK]);
        assert_eq!(pattern.next_update_at() - before, Duration::from_millis(100));
    }

    #[test]
    fn test_alternate_swaps_and_breaks_on_even_steps() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(4));
        pattern.set_pattern(PatternKind::Alternate, RED, GREEN, 100);
        step(&mut pattern);

        assert!(!step(&mut pattern));
        assert_eq!(frame(&pattern), [RED, GREEN, RED, GREEN]);

        pattern.set_pattern(PatternKind::Solid, BLACK, BLACK, 100);
        assert!(step(&mut pattern));
        assert_eq!(frame(&pattern), [GREEN, RED, GREEN, RED]);
    }

    #[test]
    fn test_flicker_draws_on_midpoint_crossings() {
        let mut pattern = Pattern::new(
            BufferedStrip::<2>::new(),
            ScriptRng::new(&[-1, 1, -1]),
        );
        pattern.set_pattern(PatternKind::Flicker, RED, BLUE, 200);
        step(&mut pattern);

        // The walk starts at the midpoint; the first downward step crosses
        // into "off".
        step(&mut pattern);
        assert_eq!(frame(&pattern), [BLUE; 2]);

        step(&mut pattern);
        assert_eq!(frame(&pattern), [RED; 2]);

        step(&mut pattern);
        assert_eq!(frame(&pattern), [BLUE; 2]);
    }

    #[test]
    fn test_lava_expands_special_colors() {
        let mut pattern = Pattern::new(BufferedStrip::<8>::new(), XorShift32::new(6));
        pattern.set_pattern(PatternKind::Lava, RANDOM, RANDOM_PRIMARY, 40);
        step(&mut pattern);

        for _ in 0..200 {
            step(&mut pattern);
        }
        for pixel in frame(&pattern) {
            assert_eq!(pixel.special, 0);
        }
    }

    #[test]
    fn test_test_pattern_phases() {
        let mut pattern = Pattern::new(BufferedStrip::<2>::new(), XorShift32::new(7));
        pattern.set_pattern(PatternKind::Test, BLACK, BLACK, 100);
        step(&mut pattern);

        for color in [RED, GREEN, BLUE, WHITE] {
            step(&mut pattern);
            assert_eq!(frame(&pattern), [color; 2]);
        }

        // Walk phase: each pixel shows each color alone.
        step(&mut pattern);
        assert_eq!(frame(&pattern), [RED, BLACK]);
        step(&mut pattern);
        assert_eq!(frame(&pattern), [GREEN, BLACK]);
        for _ in 0..6 {
            step(&mut pattern);
        }
        assert_eq!(frame(&pattern), [BLACK, WHITE]);

        // Back to the solid phase.
        step(&mut pattern);
        assert_eq!(frame(&pattern), [RED; 2]);
    }

    #[test]
    fn test_set_text_round_trip() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(5));
        pattern
            .set_text("FLICKER,0x005F1000,BLACK,200")
            .unwrap();
        assert_eq!(
            pattern.pending().map(|d| d.kind),
            Some(PatternKind::Flicker)
        );

        step(&mut pattern);
        assert_eq!(pattern.get_text().as_str(), "FLICKER,0x005F1000,BLACK,200");
    }

    #[test]
    fn test_set_text_rejects_bad_input_unchanged() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(5));
        let before = *pattern.active();

        assert_eq!(
            pattern
                .set_text("SPARKLE,RED,BLACK,100")
                .map_err(|e| e.code()),
            Err(-2)
        );
        assert!(pattern.pending().is_none());
        assert_eq!(*pattern.active(), before);

        assert_eq!(
            pattern.set_text("SOLID").map_err(TextError::code),
            Err(-1)
        );
        assert!(pattern.pending().is_none());
    }

    #[test]
    fn test_get_text_set_text_preserves_active() {
        let mut pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(9));
        pattern.set_pattern(PatternKind::Cylon, BLUE, BLACK, 1000);
        step(&mut pattern);

        let text = pattern.get_text();
        pattern.set_text(&text).unwrap();

        // A CYLON cycle on four pixels is six steps; the break comes well
        // within twenty.
        let mut adopted = false;
        for _ in 0..20 {
            if step(&mut pattern) {
                adopted = true;
                break;
            }
        }
        assert!(adopted);
        assert_eq!(pattern.get_text().as_str(), text.as_str());
    }

    #[test]
    fn test_default_descriptor_text() {
        let pattern = Pattern::new(BufferedStrip::<4>::new(), XorShift32::new(1));
        assert_eq!(pattern.get_text().as_str(), "SOLID,BLACK,BLACK,100");
    }

    /// Strip wrapper that records the widest frame ever drawn.
    struct CountingStrip<const N: usize> {
        inner: BufferedStrip<N>,
        in_frame: usize,
        widest: usize,
    }

    impl<const N: usize> CountingStrip<N> {
        fn new() -> Self {
            Self {
                inner: BufferedStrip::new(),
                in_frame: 0,
                widest: 0,
            }
        }
    }

    impl<const N: usize> Strip for CountingStrip<N> {
        fn draw_pixel(&mut self, color: Color) {
            self.in_frame += 1;
            self.widest = self.widest.max(self.in_frame);
            self.inner.draw_pixel(color);
        }

        fn finish_draw(&mut self) {
            self.in_frame = 0;
            self.inner.finish_draw();
        }

        fn pixel_count(&self) -> usize {
            N
        }

        fn pixel_buffer(&self) -> Option<&[Color]> {
            self.inner.pixel_buffer()
        }
    }

    #[test]
    fn test_no_handler_overruns_the_strip() {
        for kind in [
            PatternKind::Solid,
            PatternKind::Pulse,
            PatternKind::Cylon,
            PatternKind::Alternate,
            PatternKind::Flicker,
            PatternKind::Lava,
            PatternKind::Test,
        ] {
            let mut pattern = Pattern::new(CountingStrip::<4>::new(), XorShift32::new(8));
            pattern.set_pattern(kind, RANDOM, BLUE, 510);
            step(&mut pattern);
            for _ in 0..50 {
                step(&mut pattern);
            }

            let (strip, _, _) = pattern.into_parts();
            assert!(strip.widest <= 4, "{} overran the strip", kind.as_str());
        }
    }
}
