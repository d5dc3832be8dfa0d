// Example: a vertical list that keeps the selected row on the viewport center.
use pivot_layout::{
    Bounds, FocusDirection, ItemHandle, ItemProvider, LayoutOptions, MeasureSpec, PivotLayout,
    Size, Viewport,
};

struct Row(usize);

impl ItemHandle for Row {}

struct Rows {
    count: usize,
}

impl ItemProvider for Rows {
    type Handle = Row;

    fn item_count(&self) -> usize {
        self.count
    }

    fn get_view(&mut self, position: usize) -> Row {
        Row(position)
    }

    fn measure(&mut self, _row: &mut Row, spec: MeasureSpec) -> Size {
        Size::new(spec.cross_space, 100)
    }

    fn recycle(&mut self, _row: Row) {}
}

fn main() {
    let mut layout = PivotLayout::new(LayoutOptions::new().with_smooth_focus_changes(false))
        .expect("default options are valid");
    layout.set_viewport(Viewport::new(1920, 1000));

    let mut rows = Rows { count: 200 };
    let mut place = |row: &Row, bounds: Bounds| {
        println!("  row {} -> top={} bottom={}", row.0, bounds.top, bounds.bottom);
    };

    println!("initial layout:");
    layout.layout(&mut rows, &mut place);

    for _ in 0..5 {
        layout.move_focus(FocusDirection::Down, &mut rows, &mut |_: &Row, _: Bounds| {});
    }
    println!(
        "selected={:?} keyline={} child_keyline={:?}",
        layout.selected_position(),
        layout.parent_keyline(),
        layout.selected_position().and_then(|p| layout.child_keyline(p)),
    );
    println!(
        "materialized={:?}",
        layout.children().map(|c| c.position).collect::<Vec<_>>()
    );
}
