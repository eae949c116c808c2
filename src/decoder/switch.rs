//! Switch CLI Decoder
//!
//! Dispatches segmented switch transcript buffers to the per-command
//! decoders by command name.

use super::environment::{
    decode_fanshow, decode_psshow, decode_sensorshow, decode_slotshow, decode_tempshow,
};
use super::fabric::{decode_fabricshow, decode_ipaddrshow};
use super::firmware::decode_firmwareshow;
use super::port::{
    decode_portshow, decode_sfpshow_all, decode_sfpshow_port, decode_switchshow, switch_name,
};
use crate::domain::ports::CommandDecoder;
use crate::session::{CommandKey, Segmentation};
use crate::state::{Category, DeviceState};
use tracing::debug;

/// Commands recognized but not decoded; raw output is archived in the
/// `cfg` record under the full command line
pub const ARCHIVED_COMMANDS: &[&str] = &[
    "cfgshow",
    "zoneshow",
    "alishow",
    "cfgactvshow",
    "lscfg",
    "islshow",
    "trunkshow",
];

/// Decoder for Brocade-style switch transcripts
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchDecoder;

impl SwitchDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl CommandDecoder for SwitchDecoder {
    fn decode(&self, key: &CommandKey, lines: &[String], state: &mut DeviceState) {
        let context = state.context_mut(&key.context);
        match key.name() {
            "switchshow" => decode_switchshow(lines, context),
            "portshow" => decode_portshow(lines, context),
            "sfpshow" if key.args().split_whitespace().any(|a| a == "-all") => {
                decode_sfpshow_all(lines, context)
            }
            "sfpshow" => decode_sfpshow_port(key.args(), lines, context),
            "tempshow" => decode_tempshow(lines, context),
            "sensorshow" => decode_sensorshow(lines, context),
            "fanshow" => decode_fanshow(lines, context),
            "psshow" => decode_psshow(lines, context),
            "slotshow" => decode_slotshow(lines, context),
            "firmwareshow" => decode_firmwareshow(lines, context),
            "fabricshow" => decode_fabricshow(lines, context),
            "ipaddrshow" => decode_ipaddrshow(lines, context),
            name if ARCHIVED_COMMANDS.contains(&name) => {
                debug!(command = %key, lines = lines.len(), "Archiving raw output");
                context
                    .record_mut(Category::Cfg)
                    .insert(key.command.as_str(), lines.join("\n"));
            }
            _ => {
                debug!(command = %key, "No decoder for command, ignored");
            }
        }
    }

    /// Port rows from `switchshow` come first so later buffers can
    /// resolve slot/port references against them
    fn decode_session(&self, session: &Segmentation, state: &mut DeviceState) {
        for context in session.contexts() {
            state.register_context(context);
        }

        let (topology, rest): (Vec<_>, Vec<_>) = session
            .buffers()
            .partition(|(key, _)| key.name() == "switchshow");
        for (key, lines) in topology.into_iter().chain(rest) {
            self.decode(key, lines, state);
        }

        for context in session.contexts() {
            if let Some(name) = state.context(context).and_then(switch_name) {
                debug!(context = %context, switch = name, "Decoded switch context");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContextId;
    use crate::session::{PromptConfig, SessionSegmenter};

    fn decode(transcript: &[&str]) -> DeviceState {
        let config = PromptConfig {
            virtual_fabric: true,
            ..PromptConfig::default()
        };
        let session = SessionSegmenter::new(config).segment(transcript.iter().copied());
        let mut state = DeviceState::new();
        SwitchDecoder::new().decode_session(&session, &mut state);
        state
    }

    #[test]
    fn test_sfpshow_before_switchshow_still_resolves() {
        let state = decode(&[
            "SW01:FID128:admin> sfpshow 2/0",
            "Temperature: 36      Centigrade",
            "SW01:FID128:admin> switchshow",
            "switchName:\tSW01",
            "switchState:\tOnline",
            "Index Slot Port Address Media  Speed  State     Proto",
            "=======================================================",
            "16   2    0   011000   id    N16    Online    FC  F-Port",
            "SW01:FID128:admin> ",
        ]);

        let ctx = ContextId::new("128");
        let ports = state.table(&ctx, Category::Port).unwrap();
        assert_eq!(ports.keys().collect::<Vec<_>>(), vec!["16"]);
        assert_eq!(ports.get("16").unwrap().get("Temperature"), Some("36"));
    }

    #[test]
    fn test_contexts_are_separate() {
        let state = decode(&[
            "SW01:FID128:admin> switchshow",
            "switchState:\tOnline",
            "SW01:FID10:admin> switchshow",
            "switchState:\tOffline",
            "SW01:FID10:admin> fanshow",
            "Fan 1 is Ok, speed is 7105 RPM",
        ]);

        let fid128 = ContextId::new("128");
        let fid10 = ContextId::new("10");
        assert_eq!(
            state.record(&fid128, Category::Switch).unwrap().get("switchState"),
            Some("Online")
        );
        assert_eq!(
            state.record(&fid10, Category::Switch).unwrap().get("switchState"),
            Some("Offline")
        );
        assert!(state.table(&fid128, Category::Fan).is_none());
        assert_eq!(state.table(&fid10, Category::Fan).unwrap().len(), 1);
    }

    #[test]
    fn test_archived_and_unknown_commands() {
        let state = decode(&[
            "SW01:FID128:admin> cfgshow",
            "Defined configuration:",
            " cfg:\tcfg_prod\tzone_a",
            "SW01:FID128:admin> version",
            "Kernel:     2.6.14.2",
        ]);

        let ctx = ContextId::new("128");
        let cfg = state.record(&ctx, Category::Cfg).unwrap();
        assert_eq!(
            cfg.get("cfgshow"),
            Some("Defined configuration:\ncfg:\tcfg_prod\tzone_a")
        );
        assert_eq!(cfg.len(), 1);
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let transcript = [
            "SW01:FID128:admin> switchshow",
            "switchState:\tOnline",
            "Index Port Address  Media Speed State       Proto",
            "0   0   010000   id    N8   Online      FC  F-Port",
            "SW01:FID128:admin> sfpshow -all",
            "Port  0:",
            "Temperature: 36      Centigrade",
        ];
        let session = SessionSegmenter::new(PromptConfig {
            virtual_fabric: true,
            ..PromptConfig::default()
        })
        .segment(transcript.iter().copied());

        let decoder = SwitchDecoder::new();
        let mut once = DeviceState::new();
        decoder.decode_session(&session, &mut once);
        let mut twice = once.clone();
        decoder.decode_session(&session, &mut twice);
        assert_eq!(once, twice);
    }
}
