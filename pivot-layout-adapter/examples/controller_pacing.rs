use pivot_layout::{
    Bounds, ItemHandle, LayoutOptions, MeasureSpec, ScrollTick, Size, Viewport,
};
use pivot_layout_adapter::{
    Controller, Easing, ItemSource, Pooled, PooledProvider, ScrollPacer, ViewType,
};

struct Poster {
    title: String,
}

impl ItemHandle for Poster {}

struct Library {
    count: usize,
}

impl ItemSource for Library {
    type View = Poster;

    fn item_count(&self) -> usize {
        self.count
    }

    fn create_view(&mut self, _view_type: ViewType) -> Poster {
        Poster {
            title: String::new(),
        }
    }

    fn bind_view(&mut self, view: &mut Poster, position: usize) {
        view.title = format!("poster #{position}");
    }

    fn measure(&mut self, _view: &mut Poster, spec: MeasureSpec) -> Size {
        Size::new(spec.cross_space, 360)
    }
}

fn main() {
    // Example: a controller pacing a long smooth scroll while views cycle through the pool.
    //
    // An adapter would:
    // - forward D-pad input to move_focus / scroll_to_position
    // - call tick(now_ms) in a frame loop
    // - draw each placed view at the bounds the sink receives
    let mut provider = PooledProvider::new(Library { count: 1_000 });
    let mut controller = Controller::new(LayoutOptions::grid(4))
        .expect("grid options are valid")
        .with_pacer(ScrollPacer::new(24, 160, 240, Easing::EaseInOutCubic));
    controller.on_viewport(Viewport::new(1920, 1080));

    let mut sink = |_: &Pooled<Poster>, _: Bounds| {};
    controller.tick(0, &mut provider, &mut sink);
    controller.scroll_to_position(400, true, &mut provider, &mut sink);

    let mut now_ms = 0u64;
    loop {
        now_ms += 16;
        match controller.tick(now_ms, &mut provider, &mut sink) {
            ScrollTick::Scrolling { consumed } if now_ms % 160 == 0 => {
                println!("t={now_ms} step={consumed}");
            }
            ScrollTick::Scrolling { .. } => {}
            tick => {
                println!("t={now_ms} {tick:?}");
                break;
            }
        }
    }

    let layout = controller.layout();
    if let Some(poster) = layout.selected_position().and_then(|p| layout.handle(p)) {
        println!("selected: {}", poster.view.title);
    }
    println!("pool: {:?}", provider.stats());
}
