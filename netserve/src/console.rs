//! Diagnostic console.
//!
//! A byte-at-a-time sink registered once at bring-up (typically the
//! mini-UART transmit routine). Output before registration is dropped
//! silently; this is diagnostic text, not part of the network
//! protocol.

use spin::Mutex;

use crate::types::{Ipv4Addr, MacAddress};

/// Registered byte sink.
static SINK: Mutex<Option<fn(u8)>> = Mutex::new(None);

/// Register the output sink. Later calls replace the sink.
pub fn init(emit: fn(u8)) {
    *SINK.lock() = Some(emit);
}

/// Write one byte, translating `\n` to `\r\n` for serial terminals.
pub fn putc(byte: u8) {
    if let Some(emit) = *SINK.lock() {
        if byte == b'\n' {
            emit(b'\r');
        }
        emit(byte);
    }
}

/// Write a string.
pub fn print(s: &str) {
    for byte in s.bytes() {
        putc(byte);
    }
}

/// Write a string with newline.
pub fn println(s: &str) {
    print(s);
    putc(b'\n');
}

/// Write a u32 as hex (0x prefix).
pub fn print_hex32(value: u32) {
    print("0x");
    for i in (0..8).rev() {
        putc(hex_digit((value >> (i * 4)) as u8 & 0xF));
    }
}

/// Write a MAC address as colon-separated hex.
pub fn print_mac(mac: &MacAddress) {
    for (i, byte) in mac.as_bytes().iter().enumerate() {
        if i != 0 {
            putc(b':');
        }
        putc(hex_digit(byte >> 4));
        putc(hex_digit(byte & 0xF));
    }
}

/// Write an IPv4 address in dotted-decimal form.
pub fn print_ipv4(ip: &Ipv4Addr) {
    for (i, octet) in ip.octets().iter().enumerate() {
        if i != 0 {
            putc(b'.');
        }
        print_u8(*octet);
    }
}

fn print_u8(value: u8) {
    if value >= 100 {
        putc(b'0' + value / 100);
    }
    if value >= 10 {
        putc(b'0' + (value / 10) % 10);
    }
    putc(b'0' + value % 10);
}

fn hex_digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'a' + nibble - 10
    }
}
