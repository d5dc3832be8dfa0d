// Example: a 5-span grid driven by D-pad moves, with smooth scrolling advanced by ticks.
use pivot_layout::{
    Bounds, FocusDirection, ItemHandle, ItemProvider, LayoutOptions, MeasureSpec, PivotLayout,
    ScrollTick, Size, Viewport,
};

struct Card {
    position: usize,
    focused: bool,
}

impl ItemHandle for Card {
    fn on_selected(&mut self, _sub_position: usize) {
        self.focused = true;
    }

    fn on_deselected(&mut self) {
        self.focused = false;
    }
}

struct Catalog {
    count: usize,
}

impl ItemProvider for Catalog {
    type Handle = Card;

    fn item_count(&self) -> usize {
        self.count
    }

    fn get_view(&mut self, position: usize) -> Card {
        Card {
            position,
            focused: false,
        }
    }

    fn measure(&mut self, _card: &mut Card, spec: MeasureSpec) -> Size {
        Size::new(spec.cross_space, 240)
    }

    fn recycle(&mut self, _card: Card) {}
}

fn main() {
    let options = LayoutOptions::grid(5).with_on_selection_aligned(|selection| {
        println!("aligned: {selection:?}");
    });
    let mut layout = PivotLayout::new(options).expect("grid options are valid");
    layout.set_viewport(Viewport::new(1920, 1080));

    let mut catalog = Catalog { count: 500 };
    let mut sink = |_: &Card, _: Bounds| {};
    layout.layout(&mut catalog, &mut sink);

    let moves = [
        FocusDirection::Right,
        FocusDirection::Right,
        FocusDirection::Down,
        FocusDirection::Down,
        FocusDirection::Down,
    ];
    for direction in moves {
        let target = layout.move_focus(direction, &mut catalog, &mut sink);
        let mut frames = 0;
        while let ScrollTick::Scrolling { .. } = layout.tick(&mut catalog, &mut sink) {
            frames += 1;
        }
        println!("{direction:?} -> {target:?} after {frames} frames");
    }

    let focused: Vec<_> = layout
        .selected_position()
        .and_then(|p| layout.handle(p))
        .filter(|card| card.focused)
        .map(|card| card.position)
        .into_iter()
        .collect();
    println!("focused card: {focused:?}");
    println!("window: {:?}", layout.layout_window());
}
