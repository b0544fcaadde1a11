/*!
# Terminal Module

The interactive shell: reads lines, feeds them to the runtime, and
prints whatever comes back. `PEEK`/`POKE` are wired to a 64K RAM image;
nothing here is visible to the interpreter core beyond the injected
callbacks and the output channel.

*/

use crate::lang::Int;
use crate::mach::{Channel, Runtime};
use ansi_term::Style;
use linefeed::{Interface, ReadResult, Signal, Terminal};
use std::cell::RefCell;
use std::rc::Rc;

pub fn main() {
    if let Err(error) = main_loop() {
        eprintln!("{}", error);
    }
}

fn main_loop() -> std::io::Result<()> {
    let command = Interface::new("BASIC")?;
    command.set_report_signal(Signal::Interrupt, true);
    let mut runtime = ram_runtime();
    command.write_fmt(format_args!(
        "MICRO BASIC {}\n{} BYTES FREE\nREADY.\n",
        env!("CARGO_PKG_VERSION"),
        runtime.bytes_free()
    ))?;
    loop {
        match command.read_line()? {
            ReadResult::Input(string) => {
                let result = {
                    let mut chan = TermChannel { interface: &command };
                    runtime.enter(&string, &mut chan)
                };
                match result {
                    Ok(true) => command.write_fmt(format_args!("READY.\n"))?,
                    Ok(false) => {}
                    Err(error) => {
                        command.write_fmt(format_args!(
                            "{}\nREADY.\n",
                            Style::new().bold().paint(error.to_string())
                        ))?;
                    }
                }
                if !string.trim().is_empty() {
                    command.add_history_unique(string);
                }
            }
            ReadResult::Signal(Signal::Interrupt) => {
                command.set_buffer("")?;
            }
            ReadResult::Signal(_) | ReadResult::Eof => break,
        }
    }
    Ok(())
}

/// A runtime whose capability callbacks share a flat 64K cell image.
/// Addresses wrap at 16 bits, like the bus they stand in for.
fn ram_runtime() -> Runtime {
    let ram: Rc<RefCell<Vec<Int>>> = Rc::new(RefCell::new(vec![0; 0x1_0000]));
    let peek_ram = Rc::clone(&ram);
    let poke_ram = ram;
    Runtime::new(
        Box::new(move |addr| peek_ram.borrow()[addr as u16 as usize]),
        Box::new(move |addr, val| poke_ram.borrow_mut()[addr as u16 as usize] = val),
    )
}

struct TermChannel<'a, T: Terminal> {
    interface: &'a Interface<T>,
}

impl<T: Terminal> Channel for TermChannel<'_, T> {
    fn put_char(&mut self, ch: char) {
        let _ = self.interface.write_fmt(format_args!("{}", ch));
    }
    fn write(&mut self, s: &str) {
        let _ = self.interface.write_fmt(format_args!("{}", s));
    }
}
