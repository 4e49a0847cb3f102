mod common;

use common::*;
use datagrid_core::{CellCoords, SelectionRange};
use datagrid_widget::{HitTarget, Key, Modifiers, PointerEvent};
use proptest::prelude::*;

fn press(h: &mut Harness, (x, y): (f32, f32), modifiers: Modifiers) -> bool {
    let changed = h.grid.pointer_down(PointerEvent::new(x, y).with_modifiers(modifiers));
    h.grid.pointer_up(PointerEvent::new(x, y));
    changed
}

/// At most one of: cell family, selected rows, selected column.
fn assert_exclusive(h: &Harness) {
    let state = h.grid.state();
    let cell_family = state.active_cell().is_some() || state.selection_range().is_some();
    let families = [cell_family, !state.selected_rows().is_empty(), state.selected_column().is_some()];
    assert!(families.iter().filter(|f| **f).count() <= 1, "selection families overlap: {state:?}");
}

#[test]
fn test_hit_test_regions() {
    let h = Harness::sample(5);
    assert_eq!(h.grid.hit_test(10.0, 10.0), HitTarget::Corner);
    let (x, y) = header_point(2);
    assert_eq!(h.grid.hit_test(x, y), HitTarget::Header(2));
    let (x, y) = gutter_point(3);
    assert_eq!(h.grid.hit_test(x, y), HitTarget::Gutter(3));
    let (x, y) = cell_center(1, 4);
    assert_eq!(h.grid.hit_test(x, y), HitTarget::Cell(CellCoords::new(1, 4)));
    // Right border of column 0, inside the header
    assert_eq!(h.grid.hit_test(GUTTER + COL_W + 2.0, 16.0), HitTarget::ColumnBorder(0));
    // Bottom border of row 1, inside the gutter
    assert_eq!(h.grid.hit_test(25.0, HEADER + 2.0 * ROW_H - 1.0), HitTarget::RowBorder(1));
    // Below the last row
    assert_eq!(h.grid.hit_test(200.0, HEADER + 10.0 * ROW_H), HitTarget::None);
}

#[test]
fn test_hit_test_sticky_header_after_scroll() {
    let h = Harness::sample(50);
    h.viewport.0.borrow_mut().scroll_top = 280.0;
    // Content y 290 is 10px into the viewport: still the sticky header
    let (x, _) = header_point(1);
    assert_eq!(h.grid.hit_test(x, 290.0), HitTarget::Header(1));
    // Just below the header band the body starts at row 10
    let y = 280.0 + HEADER + 1.0;
    assert_eq!(h.grid.hit_test(x, y), HitTarget::Cell(CellCoords::new(10, 1)));
}

#[test]
fn test_click_cell_sets_active_and_single_range() {
    let mut h = Harness::sample(5);
    assert!(h.click(2, 1));
    let state = h.grid.state();
    assert_eq!(state.active_cell(), Some(CellCoords::new(2, 1)));
    assert_eq!(state.selection_range(), Some(SelectionRange::single(CellCoords::new(2, 1))));
    assert!(state.drag().is_idle());
}

#[test]
fn test_range_drag_keeps_start_fixed() {
    let mut h = Harness::sample(6);
    let (x, y) = cell_center(1, 1);
    h.grid.pointer_down(PointerEvent::new(x, y));
    let (x2, y2) = cell_center(3, 2);
    assert!(h.grid.pointer_move(PointerEvent::new(x2, y2)));
    let (x3, y3) = cell_center(0, 0);
    assert!(h.grid.pointer_move(PointerEvent::new(x3, y3)));
    h.grid.pointer_up(PointerEvent::new(x3, y3));

    let range = h.grid.state().selection_range().unwrap();
    assert_eq!(range.start, CellCoords::new(1, 1));
    assert_eq!(range.end, CellCoords::new(0, 0));
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(1, 1)));
}

#[test]
fn test_shift_click_extends_from_active() {
    let mut h = Harness::sample(6);
    h.click(1, 0);
    press(&mut h, cell_center(4, 2), Modifiers::shift());
    let range = h.grid.state().get_normalized_selection_range().unwrap();
    assert_eq!((range.min_row(), range.max_row(), range.min_col(), range.max_col()), (1, 4, 0, 2));
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(1, 0)));
}

#[test]
fn test_row_header_clicks() {
    let mut h = Harness::sample(8);
    h.click(0, 0);

    press(&mut h, gutter_point(2), Modifiers::NONE);
    assert!(h.grid.state().active_cell().is_none());
    assert_eq!(h.grid.state().selected_rows().iter().copied().collect::<Vec<_>>(), vec![2]);

    press(&mut h, gutter_point(5), Modifiers::shift());
    assert_eq!(h.grid.state().selected_rows().iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);

    // Anchor stays at 2
    press(&mut h, gutter_point(0), Modifiers::shift());
    assert_eq!(h.grid.state().selected_rows().iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);

    press(&mut h, gutter_point(1), Modifiers::ctrl());
    assert_eq!(h.grid.state().selected_rows().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    press(&mut h, gutter_point(7), Modifiers::ctrl());
    assert!(h.grid.state().is_row_selected(7));
    assert_exclusive(&h);
}

#[test]
fn test_column_header_click_clears_other_families() {
    let mut h = Harness::sample(4);
    press(&mut h, gutter_point(1), Modifiers::NONE);
    press(&mut h, header_point(3), Modifiers::NONE);
    assert_eq!(h.grid.state().selected_column(), Some(3));
    assert!(h.grid.state().selected_rows().is_empty());
    assert_exclusive(&h);

    h.click(0, 0);
    assert_eq!(h.grid.state().selected_column(), None);
    assert_exclusive(&h);
}

#[test]
fn test_select_all_and_arrows() {
    let mut h = Harness::sample(3);
    assert!(h.grid.key_down(Key::Char('a'), Modifiers::ctrl()));
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(0, 0)));
    let range = h.grid.state().get_normalized_selection_range().unwrap();
    assert_eq!((range.max_row(), range.max_col()), (2, 4));

    h.grid.select_cell(CellCoords::new(0, 0));
    h.grid.key_down(Key::ArrowUp, Modifiers::NONE);
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(0, 0)));
    h.grid.key_down(Key::ArrowRight, Modifiers::NONE);
    h.grid.key_down(Key::ArrowDown, Modifiers::NONE);
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(1, 1)));

    h.grid.key_down(Key::ArrowDown, Modifiers::shift());
    h.grid.key_down(Key::ArrowRight, Modifiers::shift());
    let range = h.grid.state().selection_range().unwrap();
    assert_eq!(range.start, CellCoords::new(1, 1));
    assert_eq!(range.end, CellCoords::new(2, 2));
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(1, 1)));
}

#[test]
fn test_select_cell_out_of_range_is_noop() {
    let mut h = Harness::sample(2);
    assert!(!h.grid.select_cell(CellCoords::new(9, 0)));
    assert!(h.grid.active_cell().is_none());
}

#[test]
fn test_pointer_down_ignored_during_drag() {
    let mut h = Harness::sample(4);
    let (x, y) = cell_center(0, 0);
    h.grid.pointer_down(PointerEvent::new(x, y));
    let (x2, y2) = cell_center(2, 2);
    assert!(!h.grid.pointer_down(PointerEvent::new(x2, y2)));
    assert_eq!(h.grid.active_cell(), Some(CellCoords::new(0, 0)));
    h.grid.pointer_up(PointerEvent::new(x, y));
}

#[derive(Debug, Clone)]
enum Op {
    Cell(usize, usize, bool),
    Gutter(usize, u8),
    Header(usize),
    Arrow(u8, bool),
    SelectAll,
    Escape,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6, 0usize..5, any::<bool>()).prop_map(|(r, c, s)| Op::Cell(r, c, s)),
        (0usize..6, 0u8..3).prop_map(|(r, m)| Op::Gutter(r, m)),
        (0usize..5).prop_map(Op::Header),
        (0u8..4, any::<bool>()).prop_map(|(d, s)| Op::Arrow(d, s)),
        Just(Op::SelectAll),
        Just(Op::Escape),
    ]
}

proptest! {
    #[test]
    fn prop_selection_families_stay_exclusive(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut h = Harness::sample(6);
        for op in ops {
            match op {
                Op::Cell(r, c, shift) => {
                    let mods = if shift { Modifiers::shift() } else { Modifiers::NONE };
                    press(&mut h, cell_center(r, c), mods);
                }
                Op::Gutter(r, m) => {
                    let mods = match m {
                        0 => Modifiers::NONE,
                        1 => Modifiers::shift(),
                        _ => Modifiers::ctrl(),
                    };
                    press(&mut h, gutter_point(r), mods);
                }
                Op::Header(c) => {
                    press(&mut h, header_point(c), Modifiers::NONE);
                }
                Op::Arrow(d, shift) => {
                    let key = [Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight][d as usize];
                    let mods = if shift { Modifiers::shift() } else { Modifiers::NONE };
                    h.grid.key_down(key, mods);
                }
                Op::SelectAll => {
                    h.grid.key_down(Key::Char('a'), Modifiers::ctrl());
                }
                Op::Escape => {
                    h.grid.key_down(Key::Escape, Modifiers::NONE);
                }
            }
            let state = h.grid.state();
            let cell_family = state.active_cell().is_some() || state.selection_range().is_some();
            let count = [cell_family, !state.selected_rows().is_empty(), state.selected_column().is_some()]
                .iter()
                .filter(|f| **f)
                .count();
            prop_assert!(count <= 1);
            prop_assert!(state.drag().is_idle());
        }
    }
}
