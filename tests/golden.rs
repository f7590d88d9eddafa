use fcars::{
    Base64Model, DecodeError, Explorer, Grid, ModelCodec, Pos2, RuleId, RuleTable, ShareParams,
    ViewBox, generate_next_model, generate_next_model_parallel,
};
use proptest::prelude::*;

/// Seed centre cell, rule 1385, one full expansion
const GOLDEN_6X6: &str = "\
111111
100001
101101
101101
100001
111111";

fn grid(text: &str) -> Grid {
    text.parse().expect("valid grid")
}

#[test]
fn seed_expands_to_golden_fixture() {
    let next = generate_next_model(&Grid::seed(), &RuleId::DEFAULT.table(), None);

    assert_eq!(next, grid(GOLDEN_6X6));
    assert_eq!(Base64Model.encode(&next), "/htth/");
}

#[test]
fn explorer_reaches_golden_fixture() {
    let mut explorer = Explorer::default();

    assert_eq!(explorer.zoom_out(), &grid(GOLDEN_6X6));
}

#[test]
fn second_expansion_is_stable() {
    let rule = RuleId::DEFAULT.table();
    let first = generate_next_model(&Grid::seed(), &rule, None);
    let second = generate_next_model(&first, &rule, None);

    assert_eq!(second.size(), 12);
    // 1385 is unchanged by reversing a child's last three inputs, so mirrored
    // models stay mirrored
    for y in 0..12 {
        for x in 0..12 {
            assert_eq!(second.get(x, y), second.get(11 - x, y), "({x}, {y})");
            assert_eq!(second.get(x, y), second.get(x, 11 - y), "({x}, {y})");
        }
    }
}

#[test]
fn codec_fixtures() {
    assert_eq!(Base64Model.encode(&Grid::seed()), "C,000");
    assert_eq!(Base64Model.decode("C,000"), Ok(Grid::seed()));

    let checkerboard = grid("1010\n0101\n1010\n0101");
    assert_eq!(Base64Model.decode(&Base64Model.encode(&checkerboard)), Ok(checkerboard));

    assert_eq!(Base64Model.decode(",10101"), Err(DecodeError::NotSquare(5)));
}

#[test]
fn view_box_fixture() {
    let view = ViewBox::centered(Pos2::new(1, 1), 2, 3);

    assert_eq!(view.min, Pos2::new(0, 0));
    assert_eq!(view.max, Pos2::new(2, 2));
}

#[test]
fn shared_link_restores_session() {
    let mut explorer = Explorer::new(RuleId::new(4660), Grid::seed(), Default::default());
    explorer.zoom_out();
    explorer.zoom_in(Pos2::new(4, 1));
    let url = explorer.share_url("https://example.org/fca/", true);

    let params = ShareParams::from_url(&url);
    assert_eq!(params.rule_or_default(), RuleId::new(4660));
    assert_eq!(&params.model_or_default(), explorer.model());
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..20).prop_flat_map(|size| {
        prop::collection::vec(any::<bool>(), size * size)
            .prop_map(move |bits| Grid::from_bits(size, bits).expect("square bits"))
    })
}

proptest! {
    #[test]
    fn prop_codec_round_trip(g in arb_grid()) {
        let encoded = Base64Model.encode(&g);
        prop_assert_eq!(Base64Model.decode(&encoded), Ok(g));
    }

    #[test]
    fn prop_full_expansion_doubles(g in arb_grid(), rule in 0u32..65536) {
        let next = generate_next_model(&g, &RuleTable::new(rule), None);
        prop_assert_eq!(next.size(), g.size() * 2);
    }

    #[test]
    fn prop_window_keeps_size_and_matches_crop(
        g in arb_grid(),
        rule in 0u32..65536,
        fx in 0i32..20,
        fy in 0i32..20,
    ) {
        let table = RuleTable::new(rule);
        let size = g.size() as i32;
        let view = ViewBox::centered(Pos2::new(fx % size, fy % size), (size + 1) / 2, size);
        let windowed = generate_next_model(&g, &table, Some(view));
        let full = generate_next_model(&g, &table, None);

        prop_assert_eq!(windowed.size(), g.size());
        for y in 0..size {
            for x in 0..size {
                prop_assert_eq!(
                    windowed.get(x, y),
                    full.get(x + view.min.x * 2, y + view.min.y * 2)
                );
            }
        }
    }

    #[test]
    fn prop_parallel_matches_serial(g in arb_grid(), rule in 0u32..65536) {
        let table = RuleTable::new(rule);
        prop_assert_eq!(
            generate_next_model(&g, &table, None),
            generate_next_model_parallel(&g, &table, None)
        );
    }

    #[test]
    fn prop_view_box_stays_inside(
        x in -50i32..100,
        y in -50i32..100,
        extent in 1i32..64,
        size_seed in 1i32..64,
    ) {
        let size = size_seed.min(extent);
        let view = ViewBox::centered(Pos2::new(x, y), size, extent);

        prop_assert_eq!(view.size(), size);
        prop_assert_eq!(view.max.y - view.min.y, size);
        prop_assert!(view.min.x >= 0 && view.min.y >= 0);
        prop_assert!(view.max.x <= extent && view.max.y <= extent);
    }
}
