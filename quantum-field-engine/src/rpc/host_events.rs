use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use crate::engine::systems::render_loop::RenderLoopCommand;
use crate::narrative::scroll_trigger::ScrollChanged;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Page events the engine reacts to directly, outside JSON-RPC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Scroll(f32),
    PageHide,
}

/// Filled by browser listeners, drained once per frame.
#[derive(Resource, Default, Clone)]
pub struct HostEventQueue(pub Arc<Mutex<Vec<HostEvent>>>);

impl HostEventQueue {
    pub fn push(&self, event: HostEvent) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(event);
        }
    }

    fn take(&self) -> Vec<HostEvent> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

pub struct HostEventsPlugin;

impl Plugin for HostEventsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HostEventQueue>()
            .add_systems(Update, drain_host_events);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_page_listeners);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_page_listeners(queue: Res<HostEventQueue>) {
    let Some(window) = web_sys::window() else {
        error!("Window object not available, page events disabled");
        return;
    };

    let scroll_queue = queue.clone();
    let scroll_window = window.clone();
    let on_scroll = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let offset = scroll_window.scroll_y().unwrap_or(0.0) as f32;
        scroll_queue.push(HostEvent::Scroll(offset));
    }) as Box<dyn FnMut(web_sys::Event)>);

    let hide_queue = queue.clone();
    let on_page_hide = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        hide_queue.push(HostEvent::PageHide);
    }) as Box<dyn FnMut(web_sys::Event)>);

    for (name, callback) in [("scroll", &on_scroll), ("pagehide", &on_page_hide)] {
        if let Err(e) = window.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
        {
            error!("Failed to register {} listener: {:?}", name, e);
        }
    }

    on_scroll.forget();
    on_page_hide.forget();
    info!("✓ Page scroll and pagehide listeners registered");
}

fn drain_host_events(
    queue: Res<HostEventQueue>,
    mut scrolls: EventWriter<ScrollChanged>,
    mut loop_commands: EventWriter<RenderLoopCommand>,
) {
    for event in queue.take() {
        match event {
            HostEvent::Scroll(offset) => {
                scrolls.write(ScrollChanged { offset });
            }
            HostEvent::PageHide => {
                info!("Page hidden, disposing render loop");
                loop_commands.write(RenderLoopCommand::Dispose);
            }
        }
    }
}
