//! Host request handling
//!
//! One JSON object per line: `{"method": "...", ...}`. Every request gets
//! exactly one reply, either `{"result": ...}` or `{"error": "..."}`.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::{
    config::ComponentConfig,
    domain::ports::{ComponentError, Dependencies, GenericComponent},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HostRequest {
    DoCommand { command: Map<String, Value> },
    Reconfigure { config: ComponentConfig },
    ValidateConfig { config: ComponentConfig },
    GetGeometries,
}

impl HostRequest {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

fn error_reply(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

fn dependencies_reply(deps: Dependencies) -> Value {
    json!({ "result": { "required": deps.required, "optional": deps.optional } })
}

/// Run one request against the component
pub async fn handle_request<C: GenericComponent>(component: &mut C, request: HostRequest) -> Value {
    let result: Result<Value, ComponentError> = match request {
        HostRequest::DoCommand { command } => component.do_command(&command).await.map(Value::Object),
        HostRequest::Reconfigure { config } => C::validate_config(&config)
            .and_then(|_| component.reconfigure(&config))
            .map(|()| json!({})),
        HostRequest::ValidateConfig { config } => {
            return match C::validate_config(&config) {
                Ok(deps) => dependencies_reply(deps),
                Err(e) => error_reply(e),
            };
        }
        HostRequest::GetGeometries => component.get_geometries().map(Value::from),
    };

    match result {
        Ok(result) => json!({ "result": result }),
        Err(e) => error_reply(e),
    }
}

/// Parse and run one request line
pub async fn handle_request_line<C: GenericComponent>(component: &mut C, line: &str) -> Value {
    match HostRequest::parse(line) {
        Ok(request) => handle_request(component, request).await,
        Err(e) => {
            log::warn!("host: invalid request: {}", e);
            error_reply(format!("invalid request: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{controllers::NeopixelComponent, infrastructure::drivers::MemoryStripFactory};
    use embassy_futures::block_on;

    fn component() -> (NeopixelComponent<MemoryStripFactory>, MemoryStripFactory) {
        let factory = MemoryStripFactory::default();
        let config = ComponentConfig::new("strip").with_attribute("num_pixels", 3);
        (
            NeopixelComponent::new(&config, factory.clone()).unwrap(),
            factory,
        )
    }

    fn handle(component: &mut NeopixelComponent<MemoryStripFactory>, line: &str) -> Value {
        block_on(handle_request_line(component, line))
    }

    #[test]
    fn parses_requests() {
        assert_eq!(
            HostRequest::parse(r#"{"method": "get_geometries"}"#).unwrap(),
            HostRequest::GetGeometries
        );

        let request =
            HostRequest::parse(r#"{"method": "reconfigure", "config": {"name": "a"}}"#).unwrap();
        assert_eq!(
            request,
            HostRequest::Reconfigure {
                config: ComponentConfig::new("a")
            }
        );
    }

    #[test]
    fn do_command_wraps_result() {
        let (mut component, _) = component();
        let reply = handle(
            &mut component,
            r#"{"method": "do_command", "command": {"action": "clear"}}"#,
        );
        assert_eq!(
            reply,
            json!({"result": {"status": "completed", "message": "Cleared all pixels"}})
        );
    }

    #[test]
    fn component_errors_become_error_replies() {
        let (mut component, _) = component();
        let reply = handle(&mut component, r#"{"method": "do_command", "command": {}}"#);
        assert_eq!(reply, json!({"error": "Command must include 'action' field"}));

        let reply = handle(&mut component, r#"{"method": "get_geometries"}"#);
        assert_eq!(reply, json!({"error": "`get_geometries` is not implemented"}));
    }

    #[test]
    fn reconfigure_replaces_strip() {
        let (mut component, factory) = component();
        let reply = handle(
            &mut component,
            r#"{"method": "reconfigure", "config": {"name": "strip", "attributes": {"num_pixels": 10}}}"#,
        );

        assert_eq!(reply, json!({"result": {}}));
        assert_eq!(factory.open_count(), 2);
        assert_eq!(component.num_pixels(), Some(10));
    }

    #[test]
    fn reconfigure_with_bad_attributes_opens_nothing() {
        let (mut component, factory) = component();
        let reply = handle(
            &mut component,
            r#"{"method": "reconfigure", "config": {"name": "strip", "attributes": {"frequency": 0}}}"#,
        );

        assert_eq!(reply, json!({"error": "frequency must be greater than 0"}));
        assert_eq!(factory.open_count(), 1);
        assert_eq!(component.num_pixels(), Some(3));
    }

    #[test]
    fn validate_config_lists_dependencies() {
        let (mut component, _) = component();
        let reply = handle(
            &mut component,
            r#"{"method": "validate_config", "config": {"name": "strip"}}"#,
        );
        assert_eq!(reply, json!({"result": {"required": [], "optional": []}}));
    }

    #[test]
    fn garbage_gets_an_error_reply() {
        let (mut component, _) = component();
        for line in ["{", r#"{"method": "reboot"}"#, r#"{"method": "do_command"}"#] {
            let reply = handle(&mut component, line);
            let message = reply["error"].as_str().unwrap();
            assert!(message.starts_with("invalid request: "), "{}", message);
        }
    }
}
