// src/tests/common.rs

//! Common data for tests.

#![allow(non_upper_case_globals)]

use crate::data::datetime::{ymdhms, DateTimeL, FixedOffset};

use ::lazy_static::lazy_static;

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P1: FixedOffset = FixedOffset::east_opt(3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::west_opt(8 * 3600).unwrap();
}

/// Helper for a [`DateTimeL`] at offset 0.
pub fn dt0(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    ymdhms(&FO_0, year, month, day, hour, min, sec).unwrap()
}

/// atop text output of two samples of one host, as printed by
/// `atop -f -r <file>`.
pub const ATOP_TWO_SAMPLES: &str = "\
ATOP - myhost          2023/01/02  10:00:00          -----------          10m0s elapsed
PRC | sys    1.23s | user   4.56s | #proc    123 | #zombie    0 | #exit      2 |
CPU | sys       2% | user      5% | irq       0% | idle    392% | wait      1% |
CPL | avg1    0.12 | avg5    1.23 | avg15   0.09 | csw    12345 | intr    6789 |
MEM | tot    15.5G | free    1.2G | cache   3.4G | buff  256.0M | slab  512.0M |
SWP | tot     2.0G | free    2.0G | vmcom   4.5G | vmlim   9.7G |
PAG | scan       0 | steal      0 | stall      0 | swin       0 | swout      0 |
DSK |          sda | busy      3% | read     123 | write    456 | avio 2.83 ms |
NET | transport    | tcpi     100 | tcpo     200 | udpi      10 | udpo      20 |
NET | network      | ipi      300 | ipo      400 | ipfrw      0 | deliv    300 |
NET | eth0      0% | pcki     500 | pcko     600 | si   12 Kbps | so    34 Kbps |
NET | lo     ----  | pcki      70 | pcko      70 | si    1 Kbps | so     1 Kbps |

  PID SYSCPU USRCPU  VGROW  RGROW  RUID     EUID      ST EXC THR S CPUNR  CPU CMD
    1  0.01s  0.02s     0K     0K  root     root      --   -   1 S     0   0% systemd

ATOP - myhost          2023/01/02  10:10:00          -----------          10m0s elapsed
PRC | sys    2.00s | user   3.00s | #proc    124 | #zombie    1 | #exit      0 |
CPU | sys       3% | user      6% | irq       1% | idle    390% | wait      0% |
CPL | avg1    0.20 | avg5    1.50 | avg15   0.10 | csw    22222 | intr    7777 |
MEM | tot    15.5G | free    1.1G | cache   3.5G | buff  256.0M | slab  512.0M |
DSK |          sda | busy      4% | read     200 | write    300 | avio 1.50 ms |
NET | eth0      0% | pcki     501 | pcko     601 | si   13 Kbps | so    35 Kbps |
";
