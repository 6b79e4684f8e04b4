use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::systems::render_loop::{LoopState, RenderLoop, RenderLoopCommand};
use crate::narrative::NarrativeEvent;
use crate::narrative::overlay::ManifestActive;
use crate::narrative::portal::{PortalClicked, PortalSequence};
use crate::narrative::scroll_trigger::{PageScroll, ScrollChanged};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing queue towards the host page.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_narrative_events,
                    notify_render_loop_state,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // JS owns the closure from here on.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Raw messages pushed by the browser listener.
#[derive(Resource, Default)]
pub struct MessageQueue(pub std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Side effect of a routed request, applied through Bevy events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RpcAction {
    RenderLoop(RenderLoopCommand),
    PortalClick,
    Scroll(f32),
}

/// Read-only view of the engine a request is answered from.
#[derive(Debug, Clone, Copy)]
pub struct RpcContext {
    pub fps: Option<f64>,
    pub loop_state: LoopState,
    pub manifest_active: bool,
    pub portal_clicks: u32,
    pub portal_stage: &'static str,
    pub scroll_offset: f32,
}

#[derive(Debug)]
pub struct RoutedRequest {
    pub action: Option<RpcAction>,
    pub result: Result<serde_json::Value, RpcError>,
}

impl RoutedRequest {
    fn reply(result: Result<serde_json::Value, RpcError>) -> Self {
        Self {
            action: None,
            result,
        }
    }

    fn act(action: RpcAction, result: serde_json::Value) -> Self {
        Self {
            action: Some(action),
            result: Ok(result),
        }
    }
}

/// Map a request onto its action and result. Requests and notifications
/// are routed the same way; only requests with an id get a response.
pub fn route_request(request: &RpcRequest, context: &RpcContext) -> RoutedRequest {
    match request.method.as_str() {
        "get_fps" => RoutedRequest::reply(Ok(serde_json::json!({
            "fps": context.fps.unwrap_or(0.0) as f32
        }))),
        "get_narrative_state" => RoutedRequest::reply(Ok(narrative_state(context))),
        "render_loop" => match parse_render_loop_command(&request.params) {
            Ok(command) => RoutedRequest::act(
                RpcAction::RenderLoop(command),
                serde_json::json!({ "success": true }),
            ),
            Err(error) => RoutedRequest::reply(Err(error)),
        },
        "portal_click" => RoutedRequest::act(
            RpcAction::PortalClick,
            serde_json::json!({ "success": true }),
        ),
        "scroll_changed" => match parse_scroll(&request.params) {
            Ok(offset) => RoutedRequest::act(
                RpcAction::Scroll(offset),
                serde_json::json!({ "success": true }),
            ),
            Err(error) => RoutedRequest::reply(Err(error)),
        },
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            RoutedRequest::reply(Err(RpcError::method_not_found(&request.method)))
        }
    }
}

fn narrative_state(context: &RpcContext) -> serde_json::Value {
    serde_json::json!({
        "render_loop": context.loop_state.as_str(),
        "manifest_active": context.manifest_active,
        "portal_clicks": context.portal_clicks,
        "portal_stage": context.portal_stage,
        "scroll_y": context.scroll_offset,
    })
}

fn parse_render_loop_command(params: &serde_json::Value) -> Result<RenderLoopCommand, RpcError> {
    #[derive(Deserialize)]
    struct RenderLoopParams {
        action: String,
    }

    let parsed = serde_json::from_value::<RenderLoopParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'action' parameter"))?;

    match parsed.action.as_str() {
        "start" => Ok(RenderLoopCommand::Start),
        "stop" => Ok(RenderLoopCommand::Stop),
        "dispose" => Ok(RenderLoopCommand::Dispose),
        other => Err(RpcError::invalid_params(&format!(
            "Unknown render loop action: {}",
            other
        ))),
    }
}

fn parse_scroll(params: &serde_json::Value) -> Result<f32, RpcError> {
    #[derive(Deserialize)]
    struct ScrollParams {
        scroll_y: f32,
    }

    let parsed = serde_json::from_value::<ScrollParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'scroll_y' parameter"))?;
    if !parsed.scroll_y.is_finite() {
        return Err(RpcError::invalid_params("'scroll_y' must be finite"));
    }
    Ok(parsed.scroll_y.max(0.0))
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    render_loop: Res<RenderLoop>,
    sequence: Res<PortalSequence>,
    page_scroll: Res<PageScroll>,
    manifest: Query<(), With<ManifestActive>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut loop_commands: EventWriter<RenderLoopCommand>,
    mut portal_clicks: EventWriter<PortalClicked>,
    mut scrolls: EventWriter<ScrollChanged>,
) {
    let context = RpcContext {
        fps: smoothed_fps(&diagnostics),
        loop_state: render_loop.state(),
        manifest_active: !manifest.is_empty(),
        portal_clicks: sequence.clicks(),
        portal_stage: sequence.stage().as_str(),
        scroll_offset: page_scroll.offset,
    };

    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
                continue;
            }
        };

        let routed = route_request(&request, &context);
        match routed.action {
            Some(RpcAction::RenderLoop(command)) => {
                loop_commands.write(command);
            }
            Some(RpcAction::PortalClick) => {
                portal_clicks.write(PortalClicked);
            }
            Some(RpcAction::Scroll(offset)) => {
                scrolls.write(ScrollChanged { offset });
            }
            None => {}
        }

        if let Some(id) = request.id {
            rpc_interface.queue_response(create_response(id, routed.result));
        }
    }
}

/// Forward story milestones to the host page.
fn forward_narrative_events(
    mut narrative_events: EventReader<NarrativeEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in narrative_events.read() {
        let params = match event {
            NarrativeEvent::ManifestActivated { scroll_offset } => {
                serde_json::json!({ "scroll_y": scroll_offset })
            }
            _ => serde_json::json!({}),
        };
        rpc_interface.send_notification(event.method(), params);
    }
}

fn notify_render_loop_state(
    render_loop: Res<RenderLoop>,
    mut last_state: Local<Option<LoopState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let state = render_loop.state();
    if *last_state == Some(state) {
        return;
    }
    *last_state = Some(state);
    rpc_interface.send_notification(
        "render_loop_state",
        serde_json::json!({ "state": state.as_str() }),
    );
}

fn create_response(
    id: serde_json::Value,
    result: Result<serde_json::Value, RpcError>,
) -> RpcResponse {
    match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Post to the embedding parent, or to the page itself when not framed.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    let target = window.parent().ok().flatten().unwrap_or(window);
                    if let Err(e) = target.post_message(&JsValue::from_str(&json), "*") {
                        error!("Failed to send message to host: {:?}", e);
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }
}
