// driver for the 8250-style debug UART (UART2) that the boot ROM leaves configured at 1.5 Mbaud
// used as the `log` backend during bring-up

use core::fmt::Write;

use bapi::PhysicalAddress;
use spin::Mutex;

pub const UART2_BASE: PhysicalAddress = PhysicalAddress(0xFEB5_0000);

const UART_THR: usize = 0x00;
const UART_LSR: usize = 0x14;
const LSR_THRE: u32 = 1 << 5;

pub struct DebugUart {
    base: *mut u32,
}

// SAFETY: the UART is a fixed MMIO block, not tied to any thread
unsafe impl Send for DebugUart {}

impl DebugUart {
    /// # Safety
    /// `base` must be the identity-mapped register block of an initialized 8250 UART.
    pub const unsafe fn new(base: PhysicalAddress) -> Self {
        Self {
            base: base.0 as *mut u32,
        }
    }

    fn put(&mut self, b: u8) {
        unsafe {
            while self.base.byte_add(UART_LSR).read_volatile() & LSR_THRE == 0 {}
            self.base.byte_add(UART_THR).write_volatile(b as u32);
        }
    }
}

impl Write for DebugUart {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                self.put(b'\r');
            }
            self.put(b);
        }
        Ok(())
    }
}

pub struct DebugUartLogger {
    uart: Mutex<DebugUart>,
}

impl log::Log for DebugUartLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut uart = self.uart.lock();
        let _ = writeln!(
            uart,
            "[{:<5} {}.{}] {}",
            record.level(),
            record.module_path().unwrap_or("unknown module"),
            record.line().unwrap_or(0),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: DebugUartLogger = DebugUartLogger {
    // SAFETY: UART2 is set up by the boot ROM before we run
    uart: Mutex::new(unsafe { DebugUart::new(UART2_BASE) }),
};

/// Send `log` output to the debug UART.
pub fn init_logging(log_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(log_level);
    log::info!("ROCK 5B+ platform bring-up");
    Ok(())
}
