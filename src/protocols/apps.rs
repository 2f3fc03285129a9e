//! Interpreters for the small fixed-layout app payloads: Cashtab messages,
//! alias registrations, PayButton, paywall payments, eCashChat
//! authentication, airdrops and CashFusion session reports.

use super::record::{
    Airdrop, PayButtonData, ProtocolRecord, UserMessage,
};
use crate::constants::protocols::CASHTAB_MSG_PREFIX;
use crate::decoder::StackArray;

const TOKEN_ID_BYTES: usize = 32;
const TX_HASH_BYTES: usize = 32;

/// `<prefix> <msg in utf8>`
pub fn interpret_cashtab_msg(stack: &StackArray) -> ProtocolRecord {
    let msg = stack.get(1).map(|b| String::from_utf8_lossy(b).into_owned());
    ProtocolRecord::UserMessage(UserMessage::Cashtab { msg })
}

/// The ciphertext is not displayable; the fragment is built from the flow
pub fn interpret_cashtab_encrypted() -> ProtocolRecord {
    ProtocolRecord::UserMessage(UserMessage::CashtabEncrypted)
}

/// `<prefix> <version 00> <alias> <address type + hash>`
pub fn interpret_alias(stack: &StackArray) -> ProtocolRecord {
    let alias = if stack.len() == 4 && stack.get(1) == Some(&[0x00][..]) {
        stack.get(2).map(|b| String::from_utf8_lossy(b).into_owned())
    } else {
        None
    };
    ProtocolRecord::UserMessage(UserMessage::Alias { alias })
}

/// `<prefix> <version> <data|OP_0> <nonce>`
pub fn interpret_pay_button(stack: &StackArray) -> ProtocolRecord {
    let data = if stack.len() >= 3 {
        match stack.get(1) {
            Some([0x00]) => match stack.get(2) {
                Some([0x00]) => PayButtonData::NoData,
                Some(bytes) => PayButtonData::Data(String::from_utf8_lossy(bytes).into_owned()),
                None => PayButtonData::OffSpec,
            },
            Some([version]) => PayButtonData::UnsupportedVersion(*version),
            _ => PayButtonData::OffSpec,
        }
    } else {
        PayButtonData::OffSpec
    };
    ProtocolRecord::UserMessage(UserMessage::PayButton(data))
}

/// `<prefix> <txid of the article this paywall is paying for>`
pub fn interpret_paywall(stack: &StackArray) -> ProtocolRecord {
    if stack.len() != 2 {
        return ProtocolRecord::UserMessage(UserMessage::Paywall {
            article_txid: None,
            off_spec: true,
        });
    }
    let article_txid = stack
        .get(1)
        .filter(|b| b.len() == TX_HASH_BYTES)
        .map(hex::encode);
    ProtocolRecord::UserMessage(UserMessage::Paywall {
        article_txid,
        off_spec: false,
    })
}

/// `<prefix> <authentication identifier>`
pub fn interpret_authentication(stack: &StackArray) -> ProtocolRecord {
    let valid = if stack.len() == 2 {
        Some(stack.get(1) != Some(&[0x00][..]))
    } else {
        None
    };
    ProtocolRecord::UserMessage(UserMessage::Authentication { valid })
}

/// `<prefix> <tokenId> [<cashtab msg prefix> <msg>]`
///
/// The recipient list is not in the payload; the flow aggregator derives it
/// from the transaction's outputs.
pub fn interpret_airdrop(stack: &StackArray) -> ProtocolRecord {
    let token_id = stack
        .get(1)
        .filter(|b| b.len() == TOKEN_ID_BYTES)
        .map(hex::encode);

    let message = if stack.len() > 3 && stack.get(2) == Some(&CASHTAB_MSG_PREFIX[..]) {
        stack.get(3).map(|b| String::from_utf8_lossy(b).into_owned())
    } else {
        None
    };

    ProtocolRecord::AirdropDistribution(Airdrop { token_id, message })
}

/// `<prefix> <sessionHash>`; the interesting numbers come from the flow
pub fn interpret_fusion(stack: &StackArray) -> ProtocolRecord {
    ProtocolRecord::CoinMixReport {
        session_id: stack.get(1).map(hex::encode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_payload;
    use crate::protocols::interpret as dispatch;

    fn interpret_script(script_hex: &str) -> ProtocolRecord {
        let script = hex::decode(script_hex).unwrap();
        dispatch(&decode_payload(&script).unwrap())
    }

    #[test]
    fn cashtab_msg_present_and_missing() {
        match interpret_script(
            "6a04007461623165436173684461793a2058454346617563657420546f70757020\
             666f722045617374657220456767206769766561776179",
        ) {
            ProtocolRecord::UserMessage(UserMessage::Cashtab { msg }) => {
                assert_eq!(
                    msg.as_deref(),
                    Some("eCashDay: XECFaucet Topup for Easter Egg giveaway")
                );
            }
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a0400746162") {
            ProtocolRecord::UserMessage(UserMessage::Cashtab { msg }) => assert!(msg.is_none()),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn alias_registration_valid_and_invalid() {
        // <prefix> 00 "lamb" <21-byte address payload>
        match interpret_script(
            "6a042e78656300046c616d6215000b7d35fda03544a08e65464d54cfae4257eb6db7",
        ) {
            ProtocolRecord::UserMessage(UserMessage::Alias { alias }) => {
                assert_eq!(alias.as_deref(), Some("lamb"));
            }
            other => panic!("unexpected record: {:?}", other),
        }

        // Wrong version byte
        match interpret_script(
            "6a042e78656301010670616e67616915000b7d35fda03544a08e65464d54cfae4257eb6db7",
        ) {
            ProtocolRecord::UserMessage(UserMessage::Alias { alias }) => assert!(alias.is_none()),
            other => panic!("unexpected record: {:?}", other),
        }

        // Incomplete stack
        match interpret_script("6a042e78656305426f6f6d21") {
            ProtocolRecord::UserMessage(UserMessage::Alias { alias }) => assert!(alias.is_none()),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn pay_button_states() {
        // version 00, OP_0 data push, nonce
        match interpret_script("6a04504159000000089057dd10be17a66a") {
            ProtocolRecord::UserMessage(UserMessage::PayButton(PayButtonData::NoData)) => {}
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a045041590000087465737464617461089057dd10be17a66a") {
            ProtocolRecord::UserMessage(UserMessage::PayButton(PayButtonData::Data(d))) => {
                assert_eq!(d, "testdata")
            }
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a04504159000101087465737464617461089057dd10be17a66a") {
            ProtocolRecord::UserMessage(UserMessage::PayButton(
                PayButtonData::UnsupportedVersion(1),
            )) => {}
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a04504159000101") {
            ProtocolRecord::UserMessage(UserMessage::PayButton(PayButtonData::OffSpec)) => {}
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn airdrop_with_and_without_message() {
        let with_msg = interpret_script(
            "6a0464726f70207c06091e745037b46c5ea60def8ad526274c2caabb1fae6c4ac8\
             9fad02fedf9a04007461624643736f6e676f72206261627920686173206265656e\
             20626f726e2e2054616b652074686973206c6974746c6520676966742066726f6d\
             20612070726f75642066617468657221",
        );
        match with_msg {
            ProtocolRecord::AirdropDistribution(a) => {
                assert_eq!(
                    a.token_id.as_deref(),
                    Some("7c06091e745037b46c5ea60def8ad526274c2caabb1fae6c4ac89fad02fedf9a")
                );
                assert_eq!(
                    a.message.as_deref(),
                    Some("Csongor baby has been born. Take this little gift from a proud father!")
                );
            }
            other => panic!("unexpected record: {:?}", other),
        }

        // Message prefix present but no message push: no message
        let no_msg = interpret_script(
            "6a0464726f70201c6c9c64d70b285befe733f175d0f384538576876bd280b10587\
             df81279d3f5e0400746162",
        );
        match no_msg {
            ProtocolRecord::AirdropDistribution(a) => {
                assert!(a.token_id.is_some());
                assert!(a.message.is_none());
            }
            other => panic!("unexpected record: {:?}", other),
        }

        // 31-byte token id: invalid
        let bad_id = interpret_script(
            "6a0464726f701f6c9c64d70b285befe733f175d0f384538576876bd280b10587df\
             81279d3f5e0400746162",
        );
        match bad_id {
            ProtocolRecord::AirdropDistribution(a) => assert!(a.token_id.is_none()),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn fusion_keeps_session_id() {
        match interpret_script(
            "6a0446555a0020771c2fa0d402fe15ba0aa2e98660facf4a8ab6801b5baf3c0b08ced685dd85ed",
        ) {
            ProtocolRecord::CoinMixReport { session_id } => {
                assert_eq!(
                    session_id.as_deref(),
                    Some("771c2fa0d402fe15ba0aa2e98660facf4a8ab6801b5baf3c0b08ced685dd85ed")
                );
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn paywall_and_authentication() {
        let paywall_hex = format!("6a047061797720{}", "ab".repeat(32));
        match interpret_script(&paywall_hex) {
            ProtocolRecord::UserMessage(UserMessage::Paywall {
                article_txid,
                off_spec,
            }) => {
                assert_eq!(article_txid.as_deref(), Some("ab".repeat(32).as_str()));
                assert!(!off_spec);
            }
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a046175746801ff") {
            ProtocolRecord::UserMessage(UserMessage::Authentication { valid }) => {
                assert_eq!(valid, Some(true))
            }
            other => panic!("unexpected record: {:?}", other),
        }

        match interpret_script("6a04617574680100") {
            ProtocolRecord::UserMessage(UserMessage::Authentication { valid }) => {
                assert_eq!(valid, Some(false))
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }
}
