// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use cloudsign_azure_storage::{
    EnvCredentialProvider, RequestSigner, SigningMode, StaticCredentialProvider,
    AZURE_STORAGE_SAS_TOKEN,
};
use cloudsign_core::{Context, HttpRequest, OsEnv, ProvideCredential, Result, Signer};
use http::header;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(OsEnv);
    let builder = match ctx.env_var(AZURE_STORAGE_SAS_TOKEN) {
        Some(token) => RequestSigner::for_secret(&token),
        None => RequestSigner::new(SigningMode::SharedKeyLite),
    };
    println!("Signing with {:?}", builder.mode());

    let loader = EnvCredentialProvider::new();
    let signer = if loader.provide_credential(&ctx).await?.is_none() {
        println!("No Azure credentials found, using demo credentials for example");
        Signer::new(
            ctx,
            StaticCredentialProvider::new(
                "devstoreaccount1",
                "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
            ),
            RequestSigner::new(SigningMode::SharedKeyLite),
        )
    } else {
        Signer::new(ctx, loader, builder)
    };

    let req = HttpRequest::builder()
        .endpoint("https://devstoreaccount1.blob.core.windows.net/mycontainer?restype=container&comp=list")
        .header("x-ms-version", "2009-09-19")
        .build()?;
    let signed = signer.sign(&req).await?;

    println!("Endpoint: {}", signed.endpoint());
    println!("Authorization: {:?}", signed.headers().get(header::AUTHORIZATION));
    Ok(())
}
