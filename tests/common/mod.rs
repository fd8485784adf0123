// Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const CATALOG_CSV: &str = "\
title,directory,tvrage,TVmaze,start date,end date,number of episodes,run time,network,country,onhiatus,onhiatusdesc
Example Show,ExampleShow,100,1234,Jan 2020,Dec 2021,5,30 min,ABC,US,,
Another Example,AnotherExample,101,5678,Mar 2019,___ ____,10,60 min,BBC,UK,,
Unrelated,Unrelated,102,9999,Feb 2000,Mar 2001,3,45 min,CBS,US,,
";

pub const EPISODE_EXPORT: &str = "\
<html><head><title>List Output</title></head><body>
<pre>
number,season,episode,airdate,title,tvmaze link
1,1,1,01 Jan 20,\"Pilot\",https://www.tvmaze.com/episodes/1
2,1,2,08 Jan 20,\"Who&#039;s There?\",https://www.tvmaze.com/episodes/2
3,1,3,15 Jan 20,\"Finale\",https://www.tvmaze.com/episodes/3
4,2,1,01 Jan 21,\"Return\",https://www.tvmaze.com/episodes/4
5,2,2,08 Jan 21,\"Ending\",https://www.tvmaze.com/episodes/5
</pre>
</body></html>
";

/// How a canned route answers.
#[derive(Clone)]
pub enum Reply {
    /// 200 with a `Content-Length` header.
    Sized(String),
    /// 200 with a chunked body of unknown length.
    Chunked(String),
    Status(u16),
    /// Sends headers, then never finishes the body.
    Stall,
}

/// Serve canned HTTP/1.1 responses by request path on a local port.
pub async fn serve(routes: Vec<(&str, Reply)>) -> SocketAddr {
    let routes: Arc<HashMap<String, Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let mut request = Vec::new();
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                let response = match routes.get(&path) {
                    Some(Reply::Sized(body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    Some(Reply::Chunked(body)) => format!(
                        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n{}\r\n0\r\n\r\n",
                        body.len(),
                        body
                    ),
                    Some(Reply::Status(code)) => format!(
                        "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        code
                    ),
                    Some(Reply::Stall) => {
                        let _ = socket
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\npartial")
                            .await;
                        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                        return;
                    }
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A client that never goes through a system proxy.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
