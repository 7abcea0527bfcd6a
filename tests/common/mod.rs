// Shared test helpers

#![allow(dead_code)]

/// Raw `obs_st` datagram with the fields the tests care about; the rest are plausible constants.
pub fn obs_packet(epoch: i64, pressure_mb: f64) -> String {
    obs_packet_with(epoch, pressure_mb, 20.0, 10.0, 0.0, 0)
}

pub fn obs_packet_with(
    epoch: i64,
    pressure_mb: f64,
    temp_c: f64,
    wind_gust_mps: f64,
    precip_mm: f64,
    lightning_count: u32,
) -> String {
    format!(
        r#"{{"serial_number":"ST-00000512","type":"obs_st","hub_sn":"HB-00013030","obs":[[{epoch},0.5,2.0,{wind_gust_mps},180,3,{pressure_mb},{temp_c},55,12000,5,300,{precip_mm},0,0,{lightning_count},2.6,1]],"firmware_revision":156}}"#
    )
}

pub const RAPID_WIND: &str =
    r#"{"serial_number":"ST-00000512","type":"rapid_wind","hub_sn":"HB-00013030","ob":[1588948614,2.3,128]}"#;

pub const HUB_STATUS: &str = r#"{"serial_number":"HB-00013030","type":"hub_status","firmware_revision":"171","uptime":1670133,"rssi":-62,"timestamp":1588948614}"#;
