use std::collections::BTreeMap;

use anyhow::Result;

use cntr::prelude::*;
use cntr_firmware_emulator::{CounterEmulator, FirmwareParams};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let fpga = CounterEmulator::new(FirmwareParams::default());

    let mut counter = Counter::open_with(
        Emulated::new(fpga),
        CounterOption {
            capture_size: 8,
            ..Default::default()
        },
    )?;

    counter.set_lut_channels(&BTreeMap::from([
        (0, SlotAssignment::from(vec![1, 2, 3])),
        (1, SlotAssignment::from([6, 7])),
        (2, SlotAssignment::from(-5)),
        (3, SlotAssignment::from([-8, 8])),
    ]))?;
    counter.set_window_size(WindowSize::DEFAULT)?;
    counter.start_measurement()?;

    // Stand in for the hardware: a few windows of counts, a stall, then
    // one more window.
    for window in 0..3u32 {
        (0..counter.desired_channels()).for_each(|ch| {
            counter.bus_mut().feed_count(100 * window + ch);
        });
    }
    let gap = 2 * counter.desired_channels();
    counter.bus_mut().feed_gap(gap);
    (0..counter.desired_channels()).for_each(|ch| {
        counter.bus_mut().feed_count(900 + ch);
    });

    let matrix = counter.read_data()?;
    println!("{matrix}");

    Ok(())
}
