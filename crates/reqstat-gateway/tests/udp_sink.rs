#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::UdpSocket;
use std::time::Duration;

use reqstat_core::Sink;
use reqstat_gateway::config::StatsdEndpoint;
use reqstat_gateway::obs::UdpSink;

fn endpoint(port: u16) -> StatsdEndpoint {
    StatsdEndpoint {
        host: "127.0.0.1".into(),
        port,
        timeout_ms: 5,
    }
}

fn daemon_on(port: u16) -> UdpSocket {
    let daemon = UdpSocket::bind(("127.0.0.1", port)).unwrap();
    daemon
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    daemon
}

fn drain(daemon: &UdpSocket) -> Vec<String> {
    let mut got = Vec::new();
    let mut buf = [0u8; 512];
    while let Ok(n) = daemon.recv(&mut buf) {
        got.push(String::from_utf8_lossy(&buf[..n]).into_owned());
    }
    got
}

#[test]
fn sends_one_datagram_per_line() {
    let daemon = daemon_on(0);
    let port = daemon.local_addr().unwrap().port();
    let sink = UdpSink::connect(&endpoint(port)).unwrap();

    sink.emit(&["a.memory:1000|ms".to_string(), "a.time:250|ms".to_string()])
        .unwrap();

    assert_eq!(drain(&daemon), vec!["a.memory:1000|ms", "a.time:250|ms"]);
}

#[test]
fn batch_survives_a_daemon_restart() {
    let port = {
        let gone = daemon_on(0);
        gone.local_addr().unwrap().port()
    };
    let sink = UdpSink::connect(&endpoint(port)).unwrap();

    // Nobody listening: leaves a pending ICMP error on the socket.
    let _ = sink.emit(&["lost:1|ms".to_string()]);
    std::thread::sleep(Duration::from_millis(20));

    let daemon = daemon_on(port);
    let _ = sink.emit(&["b.memory:1|ms".to_string(), "b.time:2|ms".to_string()]);

    let got = drain(&daemon);
    assert!(got.contains(&"b.time:2|ms".to_string()), "{got:?}");
}

#[test]
fn unresolvable_host_is_configuration_error() {
    let err = UdpSink::connect(&StatsdEndpoint {
        host: "definitely-not-a-host.invalid".into(),
        port: 8125,
        timeout_ms: 5,
    })
    .unwrap_err();
    assert_eq!(err.class().as_str(), "CONFIGURATION");
}
