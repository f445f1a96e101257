mod common;
mod receive;
mod roundtrip;
mod send;
