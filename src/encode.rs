//! Fixed-layout byte image of a [`Snapshot`] for a BLE characteristic

use crate::Snapshot;

/// Length of an encoded [`Snapshot`]
pub const SNAPSHOT_LEN: usize = 11;

/// Encode a snapshot as `lux (u32 LE) | cct (u32 LE) | red | green | blue`
pub fn encode_snapshot(snapshot: &Snapshot) -> [u8; SNAPSHOT_LEN] {
    let mut bytes = [0u8; SNAPSHOT_LEN];
    bytes[0..4].copy_from_slice(&snapshot.lux.to_le_bytes());
    bytes[4..8].copy_from_slice(&snapshot.cct.to_le_bytes());
    bytes[8] = snapshot.red;
    bytes[9] = snapshot.green;
    bytes[10] = snapshot.blue;
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let snapshot = Snapshot {
            lux: 0x0001_0203,
            cct: 6500,
            red: 0xAA,
            green: 0xBB,
            blue: 0xCC,
        };

        assert_eq!(
            encode_snapshot(&snapshot),
            [0x03, 0x02, 0x01, 0x00, 0x64, 0x19, 0x00, 0x00, 0xAA, 0xBB, 0xCC]
        );
    }
}
