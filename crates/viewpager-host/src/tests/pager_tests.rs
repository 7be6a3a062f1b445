use super::*;
use viewpager_core::{AdapterConfig, HolderId, RecordingSink, ScrollState};
use viewpager_transform::{PageSize, PageTransform, TransformerKind};

#[derive(Default)]
struct ScriptedHost {
    current: usize,
    fake_dragging: bool,
    calls: Vec<String>,
    callbacks: Vec<HostCallback>,
    padding: ContentPadding,
    transformer: Option<PageTransformer>,
    resets: Vec<ViewId>,
}

impl PagerHost for ScriptedHost {
    fn current_item(&self) -> usize {
        self.current
    }

    fn set_current_item(&mut self, index: usize, smooth: bool) {
        self.calls.push(format!("current {index} smooth={smooth}"));
        self.current = index;
    }

    fn begin_fake_drag(&mut self) -> bool {
        self.calls.push("begin".into());
        !std::mem::replace(&mut self.fake_dragging, true)
    }

    fn fake_drag_by(&mut self, offset_px: f32) -> bool {
        self.calls.push(format!("drag {offset_px}"));
        self.fake_dragging
    }

    fn end_fake_drag(&mut self) -> bool {
        self.calls.push("end".into());
        std::mem::replace(&mut self.fake_dragging, false)
    }

    fn is_fake_dragging(&self) -> bool {
        self.fake_dragging
    }

    fn set_orientation(&mut self, horizontal: bool) {
        self.calls.push(format!("horizontal={horizontal}"));
    }

    fn set_offscreen_page_limit(&mut self, limit: Option<usize>) {
        self.calls.push(format!("offscreen {limit:?}"));
    }

    fn set_user_input_enabled(&mut self, enabled: bool) {
        self.calls.push(format!("input={enabled}"));
    }

    fn set_overscroll_effect(&mut self, enabled: bool) {
        self.calls.push(format!("overscroll={enabled}"));
    }

    fn set_content_padding(&mut self, padding: ContentPadding) {
        self.padding = padding;
    }

    fn notify_range(&mut self, change: RangeChange) {
        self.calls.push(format!("{change:?}"));
    }

    fn page_transformer_mut(&mut self) -> Option<&mut PageTransformer> {
        self.transformer.as_mut()
    }

    fn replace_page_transformer(
        &mut self,
        transformer: Option<PageTransformer>,
    ) -> Option<PageTransformer> {
        std::mem::replace(&mut self.transformer, transformer)
    }

    fn reset_page_transforms(&mut self, pages: &[ViewId]) {
        self.resets.extend_from_slice(pages);
    }

    fn layout(&mut self, _adapter: &mut SlotAdapter) {}

    fn take_callbacks(&mut self) -> Vec<HostCallback> {
        std::mem::take(&mut self.callbacks)
    }
}

fn pager(config: PagerConfig) -> (Pager<ScriptedHost>, RecordingSink) {
    let sink = RecordingSink::new();
    let mut pager = Pager::new(ScriptedHost::default(), config, Rc::new(sink.clone()));
    pager.host_mut().calls.clear();
    (pager, sink)
}

/// Supplies `views` child views and binds position 0 so selections can be
/// recorded.
fn bound_pager(config: PagerConfig, views: usize, count: usize) -> (Pager<ScriptedHost>, RecordingSink) {
    let (mut pager, sink) = pager(config);
    let offset = usize::from(pager.config().adapter.base_layer);
    for index in 0..views {
        let view = pager.create_child_view();
        pager.add_child_view(view, index + offset).unwrap();
    }
    pager.set_item_count(count);
    let holder = pager.adapter_mut().create_holder();
    pager.adapter_mut().bind(holder, 0);
    pager.host_mut().calls.clear();
    sink.take();
    (pager, sink)
}

#[test]
fn construction_applies_config_to_host() {
    let sink = RecordingSink::new();
    let config = PagerConfig::default()
        .with_horizontal(true)
        .with_offscreen_page_limit(2)
        .with_swipe_enabled(false);
    let pager = Pager::new(ScriptedHost::default(), config, Rc::new(sink));
    assert_eq!(
        pager.host().calls,
        vec![
            "horizontal=true",
            "offscreen Some(2)",
            "input=false",
            "overscroll=true"
        ]
    );
}

#[test]
fn set_count_jumps_before_shrinking() {
    let (mut pager, _) = pager(PagerConfig::default());
    pager.set_item_count(5);
    pager.host_mut().calls.clear();

    pager.execute(PagerCommand::SetCount {
        count: 3,
        selected: Some(1),
    });
    assert_eq!(
        pager.host().calls,
        vec![
            "current 1 smooth=false".to_string(),
            format!("{:?}", RangeChange::Removed { start: 3, count: 2 }),
        ]
    );
}

#[test]
fn set_count_jumps_after_growing_past_old_count() {
    let (mut pager, _) = pager(PagerConfig::default());
    pager.set_item_count(2);
    pager.host_mut().calls.clear();

    pager
        .receive_command("setCount", &[CommandArg::Int(10), CommandArg::Int(7)])
        .unwrap();
    assert_eq!(
        pager.host().calls,
        vec![
            format!("{:?}", RangeChange::Inserted { start: 2, count: 8 }),
            "current 7 smooth=false".to_string(),
        ]
    );
}

#[test]
fn malformed_command_changes_nothing() {
    let (mut pager, _) = pager(PagerConfig::default());
    assert!(pager.receive_command("insertCount", &[CommandArg::Int(1)]).is_err());
    assert!(pager.receive_command("nope", &[]).is_err());
    assert!(pager.host().calls.is_empty());
    assert_eq!(pager.item_count(), 0);
}

#[test]
fn current_index_reply_ignores_listeners() {
    let (mut pager, sink) = pager(PagerConfig::default());
    pager.set_current_index(4);
    pager
        .receive_command("getCurrentIndex", &[CommandArg::from("abc")])
        .unwrap();
    assert_eq!(
        sink.events(),
        vec![PagerEvent::CurrentPosition {
            token: "abc".into(),
            position: 4
        }]
    );
}

#[test]
fn fake_drag_offsets_are_scaled_by_density() {
    let (mut pager, _) = pager(PagerConfig::default().with_density(3.0));
    pager.execute(PagerCommand::BeginFakeDrag);
    pager.execute(PagerCommand::FakeDragBy { offset: 2.0 });
    pager.execute(PagerCommand::EndFakeDrag);
    assert_eq!(pager.host().calls, vec!["begin", "drag 6", "end"]);
}

#[test]
fn scroll_events_respect_listeners() {
    let (mut pager, sink) = pager(PagerConfig::default());
    pager.dispatch(HostCallback::PageSelected {
        position: 1,
        fake: false,
    });
    assert!(sink.is_empty());

    pager.set_listeners(ScrollListeners::NONE.with("onPageChanged", true));
    pager.dispatch(HostCallback::PageSelected {
        position: 2,
        fake: true,
    });
    assert_eq!(
        sink.events(),
        vec![PagerEvent::PageChanged {
            position: 2,
            fake: true
        }]
    );
}

#[test]
fn page_change_is_deferred_until_scroll_settles() {
    let (mut pager, sink) = pager(PagerConfig::default().with_listeners(ScrollListeners::ALL));
    pager.host_mut().callbacks = vec![
        HostCallback::ScrollStateChanged {
            state: ScrollState::Dragging,
            fake: false,
        },
        HostCallback::PageScrolled {
            position: 0,
            offset: 0.5,
            offset_pixels: 120,
            fake: false,
        },
        HostCallback::PageSelected {
            position: 1,
            fake: false,
        },
        HostCallback::ScrollStateChanged {
            state: ScrollState::Idle,
            fake: false,
        },
    ];
    assert_eq!(pager.pump(), 4);

    let names: Vec<&str> = sink.events().iter().map(|event| event.name()).collect();
    assert_eq!(
        names,
        vec![
            "onPageScrollStateChanged",
            "onPageScroll",
            "onPageSelected",
            "onPageScrollStateChanged",
            "onPageChanged"
        ]
    );
    assert_eq!(pager.tracker().last_changed(), Some(1));
}

#[test]
fn unrecorded_selection_arms_no_deadline() {
    let (mut pager, _) = pager(PagerConfig::default());
    pager.set_horizontal(true);
    assert!(!pager.record_selected_item());
    assert_eq!(pager.next_event_time(), None);
}

#[test]
fn fallback_restores_recorded_item_with_settling_drag() {
    let (mut pager, _) = bound_pager(PagerConfig::default(), 1, 3);
    pager.set_horizontal(true);
    let deadline = pager.next_event_time().expect("deadline armed");
    pager.host_mut().calls.clear();

    pager.poll(deadline - Duration::from_millis(5));
    assert!(pager.host().calls.is_empty());

    pager.poll(deadline + Duration::from_millis(1));
    assert_eq!(pager.host().calls, vec!["begin", "drag 1", "end"]);
    assert_eq!(pager.next_event_time(), None);
    assert_eq!(pager.adapter().selected_item_memo(), None);
}

#[test]
fn page_change_restores_recorded_item_first() {
    let (mut pager, _) = bound_pager(PagerConfig::default(), 2, 4);
    pager.set_current_index(2);
    pager.set_horizontal(true);
    pager.host_mut().current = 0;
    pager.host_mut().calls.clear();

    pager.dispatch(HostCallback::PageSelected {
        position: 0,
        fake: false,
    });
    assert_eq!(pager.host().calls, vec!["current 2 smooth=false"]);
    assert_eq!(pager.next_event_time(), None);
}

#[test]
fn page_change_moves_base_layer() {
    let config = PagerConfig::default().with_base_layer(true);
    let (mut pager, _) = bound_pager(config, 2, 4);
    let background = pager.create_child_view();
    pager.add_child_view(background, 0).unwrap();

    pager.dispatch(HostCallback::PageSelected {
        position: 0,
        fake: false,
    });
    let container = pager.adapter().holder_container(HolderId(0)).unwrap();
    assert_eq!(pager.adapter().tree().children(container)[0], background);

    pager.dispatch(HostCallback::PageSelected {
        position: 3,
        fake: false,
    });
    assert_eq!(pager.adapter().base_layer().deferred_target(), Some(3));
}

#[test]
fn static_child_views_notify_ranges() {
    let config = PagerConfig::default().with_mode(viewpager_core::SlotMode::Static);
    let (mut pager, _) = pager(config);
    let view = pager.create_child_view();
    pager.add_child_view(view, 0).unwrap();
    pager.remove_child_view(0).unwrap();
    assert_eq!(
        pager.host().calls,
        vec![
            format!("{:?}", RangeChange::Inserted { start: 0, count: 1 }),
            format!("{:?}", RangeChange::Removed { start: 0, count: 1 }),
        ]
    );
    assert_eq!(pager.config().adapter, AdapterConfig::static_children());
}

#[test]
fn card_padding_follows_orientation() {
    let (mut pager, _) = pager(PagerConfig::default().with_density(2.0));
    pager.set_transformer(Some(
        TransformerOptions::named("card").with_padding(10.0),
    ));
    assert_eq!(pager.host().padding, ContentPadding::main_axis(20.0, false));
    assert_eq!(pager.host().padding.top, 20);

    pager.set_horizontal(true);
    assert_eq!(pager.host().padding.left, 20);
    assert_eq!(pager.host().padding.top, 0);
}

#[test]
fn switching_effects_resets_touched_pages() {
    let (mut pager, _) = pager(PagerConfig::default());
    pager.set_transformer(Some(TransformerOptions::named("card").with_padding(8.0)));
    let mut page = PageTransform::IDENTITY;
    if let Some(transformer) = pager.host_mut().page_transformer_mut() {
        transformer.transform_page(9, &mut page, PageSize::new(100.0, 100.0), 0.5);
    }

    pager.set_transformer(Some(TransformerOptions::named("depth")));
    let kind = pager
        .host_mut()
        .page_transformer_mut()
        .map(|transformer| transformer.kind());
    assert_eq!(kind, Some(TransformerKind::Depth));
    assert_eq!(pager.host().padding, ContentPadding::ZERO);
    assert_eq!(pager.host().resets, vec![9]);

    pager.set_transformer(None);
    assert!(pager.host().transformer.is_none());
    assert_eq!(pager.host().resets, vec![9, 9]);
    assert_eq!(pager.config().transformer, None);
}
